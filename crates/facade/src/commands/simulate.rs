//! Scripted render replay against an in-memory element.
//!
//! ```toml
//! tag = "my-input"
//!
//! [[step]]
//! props = { value = "a" }
//! handlers = { onChanged = "first" }
//! dispatch = ["changed"]
//! ```
//!
//! Handler names stand for functions: the same name in two steps is the
//! same function, a different name is a new one.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use facade_adapter::{
    AdapterConfig, DomOp, ElementAdapter, ElementDefinition, Event, EventHandler, HostRoot,
    MemoryElement, Node, PropValue, Props,
};

use crate::config::{load_config, load_registry};

/// A simulation script.
#[derive(Debug, Deserialize)]
pub struct Script {
    /// Registered element to render
    #[serde(default)]
    pub tag: Option<String>,

    /// Inline definition, used instead of the registry
    #[serde(default)]
    pub element: Option<ElementDefinition>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One render of the element.
#[derive(Debug, Default, Deserialize)]
pub struct Step {
    /// Prop values for this render
    #[serde(default)]
    pub props: toml::Table,

    /// Event prop -> handler name
    #[serde(default)]
    pub handlers: BTreeMap<String, String>,

    /// Events dispatched on the element after the render
    #[serde(default)]
    pub dispatch: Vec<String>,
}

/// What one step did.
#[derive(Debug, Default)]
pub struct StepReport {
    /// Mutations that reached the element
    pub ops: Vec<DomOp>,

    /// Handler invocations caused by dispatched events
    pub calls: Vec<String>,
}

/// Run the simulate command.
pub fn run(config_path: &Path, script_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    let source = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read {}", script_path.display()))?;
    let script: Script = toml::from_str(&source)
        .with_context(|| format!("Failed to parse {}", script_path.display()))?;

    let definition = match (&script.element, &script.tag) {
        (Some(definition), _) => {
            definition.validate()?;
            definition.clone()
        }
        (None, Some(tag)) => load_registry(&config, config_path)?.require(tag)?.clone(),
        (None, None) => anyhow::bail!("Script must name a `tag` or define an `[element]`"),
    };

    tracing::info!(
        "Simulating <{}> over {} steps",
        definition.tag_name,
        script.steps.len()
    );

    let reports = simulate(&definition, &config.adapter, &script.steps);
    for (i, report) in reports.iter().enumerate() {
        tracing::info!("step {}:", i + 1);
        if report.ops.is_empty() {
            tracing::info!("  (no DOM writes)");
        }
        for op in &report.ops {
            tracing::info!("  {}", op);
        }
        for call in &report.calls {
            tracing::info!("  called {}", call);
        }
    }

    Ok(())
}

/// Render each step through a host root and collect what reached the element.
pub fn simulate(
    definition: &ElementDefinition,
    config: &AdapterConfig,
    steps: &[Step],
) -> Vec<StepReport> {
    let component = ElementAdapter::with_config(config.clone()).adapt(definition);
    let element = MemoryElement::new(definition.tag_name.clone());
    let node: Node = element.clone();
    let mut root = HostRoot::new(component.instantiate(), move |_| node.clone());

    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut handlers: HashMap<String, EventHandler> = HashMap::new();
    let mut reports = Vec::with_capacity(steps.len());

    for step in steps {
        let mut props = Props::new();
        for (name, value) in &step.props {
            props.insert(name.clone(), prop_value(value));
        }
        for (prop, handler_name) in &step.handlers {
            let handler = handlers
                .entry(handler_name.clone())
                .or_insert_with(|| recording_handler(handler_name, &calls));
            props.insert(prop.clone(), handler.clone());
        }

        root.render(&props);
        let ops = element.take_journal();

        for event in &step.dispatch {
            element.dispatch(&Event::new(event.clone()));
        }

        reports.push(StepReport {
            ops,
            calls: std::mem::take(&mut *calls.borrow_mut()),
        });
    }

    root.unmount();
    reports
}

/// Script values as props. Datetimes are passed as their TOML text.
fn prop_value(value: &toml::Value) -> PropValue {
    match value {
        toml::Value::Float(f) => PropValue::Number(*f),
        other => PropValue::from_json(to_json(other)),
    }
}

fn to_json(value: &toml::Value) -> JsonValue {
    match value {
        toml::Value::String(s) => JsonValue::String(s.clone()),
        toml::Value::Integer(i) => JsonValue::from(*i),
        toml::Value::Float(f) => {
            serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
        }
        toml::Value::Boolean(b) => JsonValue::Bool(*b),
        toml::Value::Datetime(dt) => JsonValue::String(dt.to_string()),
        toml::Value::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        toml::Value::Table(table) => JsonValue::Object(
            table
                .iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
    }
}

fn recording_handler(name: &str, calls: &Rc<RefCell<Vec<String>>>) -> EventHandler {
    let name = name.to_string();
    let calls = Rc::clone(calls);
    EventHandler::new(move |event: &Event| {
        calls
            .borrow_mut()
            .push(format!("{}('{}')", name, event.event_type));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input() -> ElementDefinition {
        ElementDefinition::new("my-input")
            .property("value")
            .event("onChanged", "changed")
    }

    fn ops(report: &StepReport) -> Vec<String> {
        report.ops.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn replays_value_and_handler_changes() {
        let script: Script = toml::from_str(
            r#"
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
"#,
        )
        .unwrap();

        let reports = simulate(&input(), &AdapterConfig::default(), &script.steps);

        assert_eq!(reports.len(), 3);
        assert_eq!(
            ops(&reports[0]),
            vec![
                "attribute label=\"Name\"",
                "add listener 'changed'",
                "property value = \"a\"",
            ]
        );
        assert_eq!(reports[0].calls, vec!["first('changed')"]);

        assert!(reports[1].ops.is_empty());
        assert_eq!(reports[1].calls, vec!["second('changed')"]);

        assert_eq!(
            ops(&reports[2]),
            vec![
                "remove attribute label",
                "remove listener 'changed'",
                "property value = \"b\"",
            ]
        );
        assert!(reports[2].calls.is_empty());
    }

    #[test]
    fn same_handler_name_is_the_same_function() {
        let steps: Vec<Step> = ["first", "first"]
            .iter()
            .map(|name| Step {
                handlers: BTreeMap::from([("onChanged".to_string(), name.to_string())]),
                ..Step::default()
            })
            .collect();

        let reports = simulate(&input(), &AdapterConfig::default(), &steps);

        assert_eq!(reports[0].ops.len(), 1);
        assert!(reports[1].ops.is_empty());
    }

    #[test]
    fn structured_values_are_new_each_step() {
        let script: Script = toml::from_str(
            r#"
[element]
tag_name = "my-list"
properties = ["items"]

[[step]]
props = { items = [1, 2] }

[[step]]
props = { items = [1, 2] }
"#,
        )
        .unwrap();
        let definition = script.element.clone().unwrap();

        let reports = simulate(&definition, &AdapterConfig::default(), &script.steps);

        assert_eq!(ops(&reports[0]), vec!["property items = [1,2]"]);
        assert_eq!(ops(&reports[1]), vec!["property items = [1,2]"]);
    }

    #[test]
    fn datetimes_are_passed_as_text() {
        let script: Script = toml::from_str(
            r#"
[element]
tag_name = "my-calendar"
properties = ["date", "range"]

[[step]]
props = { date = 2024-05-01, range = { from = 2024-05-01T10:00:00Z }, ratio = 0.5 }
"#,
        )
        .unwrap();
        let definition = script.element.clone().unwrap();

        let reports = simulate(&definition, &AdapterConfig::default(), &script.steps);

        assert_eq!(
            ops(&reports[0]),
            vec![
                "attribute ratio=\"0.5\"",
                "property date = \"2024-05-01\"",
                "property range = {\"from\":\"2024-05-01T10:00:00Z\"}",
            ]
        );
    }
}
