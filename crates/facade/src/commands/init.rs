//! Initialize facade in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing facade...");

    let root = config_path.parent().unwrap_or(Path::new(""));
    let elements_dir = root.join("elements");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    if !elements_dir.exists() {
        fs::create_dir_all(&elements_dir).context("Failed to create elements directory")?;
    }

    write_sample(&elements_dir.join("my-input.toml"), DEFAULT_ELEMENT, yes)?;
    write_sample(&root.join("simulate.toml"), DEFAULT_SCRIPT, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'facade inspect' to see how my-input props are routed.");

    Ok(())
}

fn write_sample(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Facade Configuration

[manifests]
# Directory scanned for element definitions (*.toml and custom-elements.json)
dir = "elements"

[adapter]
# Props owned by the host framework; never written to the element
reserved = ["children", "localName", "ref", "style", "className"]

[adapter.aliases]
# Host attribute name used for a reserved prop
className = "class"
"#;

const DEFAULT_ELEMENT: &str = r#"[[element]]
tag_name = "my-input"
display_name = "MyInput"
# Element-specific properties, assigned directly on the node
properties = ["value", "options"]

# Event props: prop name -> DOM event name
[element.events]
onChanged = "changed"
"#;

const DEFAULT_SCRIPT: &str = r#"# Replay with: facade simulate simulate.toml
tag = "my-input"

[[step]]
props = { value = "a", label = "Name" }
handlers = { onChanged = "first" }
dispatch = ["changed"]

[[step]]
props = { value = "a", label = "Name" }
handlers = { onChanged = "second" }
dispatch = ["changed"]

[[step]]
props = { value = "b" }
dispatch = ["changed"]
"#;
