//! Prop routing inspection command.

use std::path::Path;

use anyhow::Result;
use facade_adapter::{AdaptedComponent, AdapterConfig, ElementAdapter, PropKind};

use crate::config::{load_config, load_registry};

/// Run the inspect command.
pub fn run(config_path: &Path, tag: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config, config_path)?;
    let adapter = ElementAdapter::with_config(config.adapter.clone());

    let elements: Vec<_> = match tag {
        Some(tag) => vec![registry
            .get(tag)
            .ok_or_else(|| anyhow::anyhow!("Unknown element <{}>", tag))?],
        None => registry.iter().collect(),
    };

    if elements.is_empty() {
        tracing::info!("No elements registered.");
        return Ok(());
    }

    for element in elements {
        let component = adapter.adapt(&element.definition);
        tracing::info!(
            "<{}> {} ({})",
            component.tag_name(),
            component.display_name(),
            element.source_path.display()
        );
        for line in describe(&component, adapter.config()) {
            tracing::info!("  {}", line);
        }
    }

    Ok(())
}

/// One line per routed prop, then the reserved props.
pub fn describe(component: &AdaptedComponent, config: &AdapterConfig) -> Vec<String> {
    let mut lines: Vec<String> = component
        .properties()
        .iter()
        .map(|(name, kind)| match kind {
            PropKind::Property => format!("property  {name}"),
            PropKind::Event(event) => format!("event     {name} -> '{event}'"),
        })
        .collect();

    let reserved: Vec<String> = config
        .reserved
        .iter()
        .map(|name| match config.host_name(name) {
            host if host != name.as_str() => format!("{name} (as {host})"),
            _ => name.clone(),
        })
        .collect();
    lines.push(format!("reserved  {}", reserved.join(", ")));
    lines.push("other props are forwarded as attributes".to_string());

    lines
}
