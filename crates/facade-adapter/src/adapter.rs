//! Custom element adapter.
//!
//! [`ElementAdapter::adapt`] turns an [`ElementDefinition`] into an
//! [`AdaptedComponent`]. Each use of the component is an [`AdapterInstance`]
//! which splits incoming props between the host framework and the element,
//! and after every commit writes changed element props straight onto the
//! live node as properties or event listeners.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::AdapterConfig;
use crate::definition::ElementDefinition;
use crate::dom::Node;
use crate::props::Props;
use crate::refs::{NodeRef, RefCallback};
use crate::registry::bind_event;
use crate::traits::{HostComponent, RenderedElement};
use crate::value::PropValue;

/// How an element-routed prop reaches the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKind {
    /// Assigned as a live property
    Property,
    /// Installed as a listener for the named DOM event
    Event(String),
}

/// Where a prop goes during render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropRoute {
    /// Owned by the host, forwarded under the given (possibly aliased) name
    Reserved(String),
    /// Written to the element as a property
    Property,
    /// Bound to the named DOM event
    Event(String),
    /// Left to the host's attribute handling
    Attribute,
}

/// Element-routed prop names, fixed when the component is created.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: BTreeMap<String, PropKind>,
}

impl PropertyMap {
    /// Merge the event map and declared properties, leaving out reserved names.
    pub fn new(definition: &ElementDefinition, config: &AdapterConfig) -> Self {
        let mut entries = BTreeMap::new();

        for (prop, event) in &definition.events {
            if config.is_reserved(prop) {
                tracing::warn!(
                    tag = %definition.tag_name,
                    prop = %prop,
                    "event prop uses a reserved name and will not be bound"
                );
                continue;
            }
            entries.insert(prop.clone(), PropKind::Event(event.clone()));
        }

        for name in &definition.properties {
            if config.is_reserved(name) {
                tracing::warn!(
                    tag = %definition.tag_name,
                    property = %name,
                    "element property uses a reserved name and will not be set"
                );
                continue;
            }
            entries.entry(name.clone()).or_insert(PropKind::Property);
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&PropKind> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropKind)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Factory for adapted components.
#[derive(Debug, Clone, Default)]
pub struct ElementAdapter {
    config: AdapterConfig,
}

impl ElementAdapter {
    /// Create an adapter with the default reserved props.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Build the component for `definition`.
    pub fn adapt(&self, definition: &ElementDefinition) -> AdaptedComponent {
        let properties = PropertyMap::new(definition, &self.config);
        tracing::debug!(
            tag = %definition.tag_name,
            routed = properties.len(),
            "adapted custom element"
        );

        AdaptedComponent {
            shared: Rc::new(ComponentShared {
                tag_name: definition.tag_name.clone(),
                display_name: definition.name(),
                properties,
                config: self.config.clone(),
            }),
        }
    }
}

/// A custom element usable as a host component.
///
/// Cloning is cheap; all clones and instances share one property map.
#[derive(Debug, Clone)]
pub struct AdaptedComponent {
    shared: Rc<ComponentShared>,
}

#[derive(Debug)]
struct ComponentShared {
    tag_name: String,
    display_name: String,
    properties: PropertyMap,
    config: AdapterConfig,
}

impl AdaptedComponent {
    pub fn tag_name(&self) -> &str {
        &self.shared.tag_name
    }

    pub fn display_name(&self) -> &str {
        &self.shared.display_name
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.shared.properties
    }

    /// Classify a prop name.
    pub fn route(&self, name: &str) -> PropRoute {
        let shared = &self.shared;
        if shared.config.is_reserved(name) {
            return PropRoute::Reserved(shared.config.host_name(name).to_string());
        }
        match shared.properties.get(name) {
            Some(PropKind::Property) => PropRoute::Property,
            Some(PropKind::Event(event)) => PropRoute::Event(event.clone()),
            None => PropRoute::Attribute,
        }
    }

    /// Create the state for one mounted use of the component.
    pub fn instantiate(&self) -> AdapterInstance {
        let node = Rc::new(RefCell::new(None));
        let ref_callback = wrap_ref(&node, None);
        AdapterInstance {
            component: self.clone(),
            node,
            caller_ref: None,
            ref_callback,
            element_props: BTreeMap::new(),
            applied: BTreeMap::new(),
        }
    }
}

/// Per-use adapter state.
#[derive(Debug)]
pub struct AdapterInstance {
    component: AdaptedComponent,
    /// First non-null node handed to our ref
    node: Rc<RefCell<Option<Node>>>,
    /// Caller ref seen on the last render
    caller_ref: Option<NodeRef>,
    ref_callback: RefCallback,
    /// Element-routed props from the last render
    element_props: BTreeMap<String, PropValue>,
    /// Values last written to the node
    applied: BTreeMap<String, PropValue>,
}

impl AdapterInstance {
    pub fn component(&self) -> &AdaptedComponent {
        &self.component
    }

    /// The node captured by this instance's ref, once mounted.
    pub fn node(&self) -> Option<Node> {
        self.node.borrow().clone()
    }

    /// Element-routed props held from the last render.
    pub fn element_props(&self) -> &BTreeMap<String, PropValue> {
        &self.element_props
    }

    /// Write changed element props to the node. No-op until a node exists.
    pub fn update_element(&mut self) {
        let Some(node) = self.node() else {
            tracing::trace!(tag = self.component.tag_name(), "no node yet, skipping update");
            return;
        };

        let shared = Rc::clone(&self.component.shared);
        for (name, kind) in shared.properties.iter() {
            let new = self.element_props.get(name).cloned().unwrap_or_default();
            let old = self.applied.get(name).cloned().unwrap_or_default();
            if new.strict_eq(&old) {
                continue;
            }

            match kind {
                PropKind::Event(event) => bind_event(&node, event, &new),
                PropKind::Property => {
                    tracing::debug!(
                        tag = node.tag_name(),
                        property = name,
                        kind = new.type_name(),
                        "set element property"
                    );
                    node.set_property(name, new.clone());
                }
            }

            if new.is_undefined() {
                self.applied.remove(name);
            } else {
                self.applied.insert(name.to_string(), new);
            }
        }
    }
}

impl HostComponent for AdapterInstance {
    fn name(&self) -> &str {
        self.component.display_name()
    }

    fn render(&mut self, props: &Props) -> RenderedElement {
        let caller_ref = props.node_ref().cloned();
        let ref_changed = match (&self.caller_ref, &caller_ref) {
            (Some(old), Some(new)) => !old.ptr_eq(new),
            (None, None) => false,
            _ => true,
        };
        if ref_changed {
            self.ref_callback = wrap_ref(&self.node, caller_ref.clone());
            self.caller_ref = caller_ref;
        }

        self.element_props.clear();
        let mut host_props = BTreeMap::new();
        for (name, value) in props {
            match self.component.route(name) {
                PropRoute::Property | PropRoute::Event(_) => {
                    self.element_props.insert(name.clone(), value.clone());
                }
                PropRoute::Reserved(host_name) => {
                    host_props.insert(host_name, value.clone());
                }
                PropRoute::Attribute => {
                    host_props.insert(name.clone(), value.clone());
                }
            }
        }

        RenderedElement {
            tag_name: self.component.tag_name().to_string(),
            props: host_props,
            node_ref: self.ref_callback.clone(),
        }
    }

    fn did_mount(&mut self) {
        self.update_element();
    }

    fn did_update(&mut self) {
        self.update_element();
    }

    fn will_unmount(&mut self) {
        tracing::trace!(tag = self.component.tag_name(), "discarding instance state");
        *self = self.component.instantiate();
    }
}

/// Build the ref handed to the host: it captures the node for the adapter
/// and passes every value on to the caller's ref.
fn wrap_ref(slot: &Rc<RefCell<Option<Node>>>, caller: Option<NodeRef>) -> RefCallback {
    let slot = Rc::clone(slot);
    RefCallback::new(move |node: Option<Node>| {
        if let Some(node) = &node {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(Rc::clone(node));
            }
        }
        if let Some(caller) = &caller {
            caller.fulfil(node);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomOp, ElementNode, MemoryElement};
    use crate::refs::NodeCell;
    use crate::registry::with_registry;
    use pretty_assertions::assert_eq;

    fn input_definition() -> ElementDefinition {
        ElementDefinition::new("my-input")
            .property("value")
            .property("options")
            .event("onChanged", "changed")
    }

    fn mount(instance: &mut AdapterInstance, props: &Props) -> Rc<MemoryElement> {
        let element = MemoryElement::new("my-input");
        let node: Node = element.clone();
        let rendered = instance.render(props);
        rendered.node_ref.call(Some(node));
        instance.did_mount();
        element
    }

    #[test]
    fn classifies_props() {
        let component = ElementAdapter::new().adapt(&input_definition());

        assert_eq!(component.route("value"), PropRoute::Property);
        assert_eq!(component.route("onChanged"), PropRoute::Event("changed".into()));
        assert_eq!(component.route("label"), PropRoute::Attribute);
        assert_eq!(component.route("children"), PropRoute::Reserved("children".into()));
        assert_eq!(component.route("className"), PropRoute::Reserved("class".into()));
        assert_eq!(component.display_name(), "MyInput");
        assert_eq!(component.properties().len(), 3);
    }

    #[test]
    fn reserved_names_are_never_element_routed() {
        let definition = input_definition().property("style").event("ref", "ref-changed");
        let component = ElementAdapter::new().adapt(&definition);

        assert!(!component.properties().contains("style"));
        assert!(!component.properties().contains("ref"));
        assert_eq!(component.route("style"), PropRoute::Reserved("style".into()));
    }

    #[test]
    fn event_map_wins_over_property_declaration() {
        let definition = ElementDefinition::new("my-input")
            .property("onChanged")
            .event("onChanged", "changed");
        let component = ElementAdapter::new().adapt(&definition);

        assert_eq!(
            component.properties().get("onChanged"),
            Some(&PropKind::Event("changed".into()))
        );
    }

    #[test]
    fn render_partitions_props() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();

        let props = Props::new()
            .with("value", "a")
            .with("label", "Name")
            .with("className", "wide")
            .with_handler("onChanged", |_| {});
        let rendered = instance.render(&props);

        assert_eq!(rendered.tag_name, "my-input");
        let host: Vec<&str> = rendered.props.keys().map(String::as_str).collect();
        assert_eq!(host, vec!["class", "label"]);
        let element: Vec<&str> = instance.element_props().keys().map(String::as_str).collect();
        assert_eq!(element, vec!["onChanged", "value"]);
    }

    #[test]
    fn update_before_mount_is_noop() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();

        instance.render(&Props::new().with("value", "a"));
        instance.did_mount();

        assert!(instance.node().is_none());
    }

    #[test]
    fn writes_only_changed_properties() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();
        let options = PropValue::from_json(serde_json::json!(["x", "y"]));

        let element = mount(
            &mut instance,
            &Props::new().with("value", "a").with("options", options.clone()),
        );
        assert_eq!(element.take_journal().len(), 2);

        instance.render(&Props::new().with("value", "a").with("options", options.clone()));
        instance.did_update();
        assert!(element.take_journal().is_empty());

        instance.render(&Props::new().with("options", options));
        instance.did_update();
        assert_eq!(
            element.take_journal(),
            vec![DomOp::SetProperty {
                name: "value".into(),
                value: PropValue::Undefined
            }]
        );
        assert_eq!(element.property("options").type_name(), "array");
    }

    #[test]
    fn rich_values_are_assigned_by_identity() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();
        let element = mount(
            &mut instance,
            &Props::new().with("options", serde_json::json!({ "a": 1 })),
        );
        element.take_journal();

        // Same content, new identity: written again.
        instance.render(&Props::new().with("options", serde_json::json!({ "a": 1 })));
        instance.did_update();
        assert_eq!(element.take_journal().len(), 1);
    }

    #[test]
    fn first_node_wins_and_caller_ref_is_forwarded() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();
        let cell = NodeCell::new();

        let rendered = instance.render(&Props::new().with_ref(&cell));
        let first: Node = MemoryElement::new("my-input");
        let second: Node = MemoryElement::new("my-input");
        rendered.node_ref.call(Some(first.clone()));
        rendered.node_ref.call(None);
        rendered.node_ref.call(Some(second.clone()));

        assert!(Rc::ptr_eq(&instance.node().unwrap(), &first));
        assert!(Rc::ptr_eq(&cell.current().unwrap(), &second));
    }

    #[test]
    fn ref_callback_is_rebuilt_only_when_caller_ref_changes() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();
        let cell = NodeCell::new();

        let a = instance.render(&Props::new().with_ref(&cell)).node_ref;
        let b = instance.render(&Props::new().with_ref(&cell)).node_ref;
        let c = instance.render(&Props::new().with_ref(&NodeCell::new())).node_ref;
        let d = instance.render(&Props::new()).node_ref;
        let e = instance.render(&Props::new()).node_ref;

        assert!(a.ptr_eq(&b));
        assert!(!b.ptr_eq(&c));
        assert!(!c.ptr_eq(&d));
        assert!(d.ptr_eq(&e));
    }

    #[test]
    fn instances_share_the_property_map() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let a = component.instantiate();
        let b = component.clone().instantiate();

        assert!(Rc::ptr_eq(&a.component().shared, &b.component().shared));
    }

    #[test]
    fn clearing_event_prop_removes_listener() {
        let component = ElementAdapter::new().adapt(&input_definition());
        let mut instance = component.instantiate();
        let element = mount(&mut instance, &Props::new().with_handler("onChanged", |_| {}));
        let node: Node = element.clone();
        assert_eq!(with_registry(|r| r.events(&node)), vec!["changed"]);

        instance.render(&Props::new());
        instance.did_update();

        assert!(element.listeners("changed").is_empty());
        assert!(with_registry(|r| r.events(&node)).is_empty());
    }
}
