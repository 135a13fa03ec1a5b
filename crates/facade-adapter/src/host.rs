//! Minimal host reconciliation loop for a single element.
//!
//! [`HostRoot`] does what a component framework does for one element: create
//! the node on first render, sync pass-through props as attributes, attach
//! the component's ref and run its commit hooks.

use std::collections::BTreeMap;

use crate::dom::Node;
use crate::props::Props;
use crate::refs::RefCallback;
use crate::traits::HostComponent;
use crate::value::PropValue;

/// Drives one [`HostComponent`] through render and commit.
pub struct HostRoot<C: HostComponent> {
    component: C,
    create: Box<dyn Fn(&str) -> Node>,
    node: Option<Node>,
    attached_ref: Option<RefCallback>,
    attributes: BTreeMap<String, String>,
    mounted: bool,
}

impl<C: HostComponent> HostRoot<C> {
    /// Create a root that builds nodes with `create(tag_name)`.
    pub fn new(component: C, create: impl Fn(&str) -> Node + 'static) -> Self {
        Self {
            component,
            create: Box::new(create),
            node: None,
            attached_ref: None,
            attributes: BTreeMap::new(),
            mounted: false,
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Render and commit `props`, returning the node.
    pub fn render(&mut self, props: &Props) -> Node {
        let rendered = self.component.render(props);

        let node = match &self.node {
            Some(node) => node.clone(),
            None => {
                let node = (self.create)(&rendered.tag_name);
                tracing::debug!(component = self.component.name(), tag = %rendered.tag_name, "created node");
                self.node = Some(node.clone());
                node
            }
        };

        self.sync_attributes(&node, &rendered.props);

        let ref_changed = match &self.attached_ref {
            Some(attached) => !attached.ptr_eq(&rendered.node_ref),
            None => true,
        };
        if ref_changed {
            if let Some(old) = self.attached_ref.take() {
                old.call(None);
            }
            rendered.node_ref.call(Some(node.clone()));
            self.attached_ref = Some(rendered.node_ref);
        }

        if self.mounted {
            self.component.did_update();
        } else {
            self.mounted = true;
            self.component.did_mount();
        }

        node
    }

    /// Detach the ref and drop the node. The next render mounts a new one.
    pub fn unmount(&mut self) {
        if self.mounted {
            self.component.will_unmount();
        }
        if let Some(attached) = self.attached_ref.take() {
            attached.call(None);
        }
        self.node = None;
        self.attributes.clear();
        self.mounted = false;
        tracing::debug!(component = self.component.name(), "unmounted");
    }

    fn sync_attributes(&mut self, node: &Node, props: &BTreeMap<String, PropValue>) {
        let desired: BTreeMap<String, String> = props
            .iter()
            .filter(|(name, _)| name.as_str() != "children")
            .filter_map(|(name, value)| value.to_attribute().map(|v| (name.clone(), v)))
            .collect();

        for name in self.attributes.keys() {
            if !desired.contains_key(name) {
                node.remove_attribute(name);
            }
        }
        for (name, value) in &desired {
            if self.attributes.get(name) != Some(value) {
                node.set_attribute(name, value);
            }
        }

        self.attributes = desired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AdapterInstance, ElementAdapter};
    use crate::definition::ElementDefinition;
    use crate::dom::{DomOp, ElementNode, MemoryElement};
    use crate::event::Event;
    use crate::refs::{NodeCell, NodeRef};
    use crate::registry::with_registry;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A root whose nodes are also handed back to the test.
    fn root(definition: &ElementDefinition) -> (HostRoot<AdapterInstance>, Rc<RefCell<Vec<Rc<MemoryElement>>>>) {
        let created = Rc::new(RefCell::new(Vec::new()));
        let sink = created.clone();
        let instance = ElementAdapter::new().adapt(definition).instantiate();
        let root = HostRoot::new(instance, move |tag| {
            let element = MemoryElement::new(tag);
            sink.borrow_mut().push(element.clone());
            let node: Node = element;
            node
        });
        (root, created)
    }

    fn input_definition() -> ElementDefinition {
        ElementDefinition::new("my-input")
            .property("value")
            .event("onChanged", "changed")
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> crate::event::EventHandler {
        let log = log.clone();
        crate::event::EventHandler::new(move |e: &Event| {
            log.borrow_mut().push(format!("{name}:{}", e.event_type))
        })
    }

    #[test]
    fn value_and_event_scenario() {
        let (mut root, created) = root(&input_definition());
        let log = Rc::new(RefCell::new(Vec::new()));
        let fn1 = recorder(&log, "fn1");
        let fn2 = recorder(&log, "fn2");

        root.render(&Props::new().with("value", "a").with("onChanged", fn1));
        let element = created.borrow()[0].clone();
        assert_eq!(
            element.take_journal(),
            vec![
                DomOp::AddListener {
                    event: "changed".into()
                },
                DomOp::SetProperty {
                    name: "value".into(),
                    value: "a".into()
                },
            ]
        );
        element.dispatch(&Event::new("changed"));

        let installed = element.listeners("changed")[0].clone();
        root.render(&Props::new().with("value", "a").with("onChanged", fn2));
        assert!(element.take_journal().is_empty());
        assert!(Rc::ptr_eq(&installed, &element.listeners("changed")[0]));
        element.dispatch(&Event::new("changed"));

        root.render(&Props::new().with("value", "b"));
        assert_eq!(
            element.take_journal(),
            vec![
                DomOp::RemoveListener {
                    event: "changed".into()
                },
                DomOp::SetProperty {
                    name: "value".into(),
                    value: "b".into()
                },
            ]
        );
        element.dispatch(&Event::new("changed"));

        assert_eq!(*log.borrow(), vec!["fn1:changed", "fn2:changed"]);
        let node: Node = element.clone();
        assert!(with_registry(|r| r.listener(&node, "changed")).is_none());
        assert_eq!(created.borrow().len(), 1);
    }

    #[test]
    fn pass_through_props_become_attributes() {
        let (mut root, created) = root(&input_definition());

        root.render(
            &Props::new()
                .with("label", "Name")
                .with("required", true)
                .with("size", 3)
                .with("className", "wide")
                .with("children", "text"),
        );
        let element = created.borrow()[0].clone();
        assert_eq!(element.attribute("label").as_deref(), Some("Name"));
        assert_eq!(element.attribute("required").as_deref(), Some(""));
        assert_eq!(element.attribute("size").as_deref(), Some("3"));
        assert_eq!(element.attribute("class").as_deref(), Some("wide"));
        assert_eq!(element.attribute("children"), None);
        element.take_journal();

        // Unchanged attributes are not rewritten; dropped ones are removed.
        root.render(
            &Props::new()
                .with("label", "Name")
                .with("required", false)
                .with("className", "wide"),
        );
        assert_eq!(
            element.take_journal(),
            vec![
                DomOp::RemoveAttribute {
                    name: "required".into()
                },
                DomOp::RemoveAttribute {
                    name: "size".into()
                },
            ]
        );
        assert_eq!(element.property("label"), PropValue::Undefined);
    }

    #[test]
    fn callback_ref_sees_attach_and_detach() {
        let (mut root, _) = root(&input_definition());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let node_ref = {
            let seen = seen.clone();
            NodeRef::callback(move |node: Option<Node>| {
                seen.borrow_mut().push(node.map(|n| n.tag_name().to_string()))
            })
        };

        root.render(&Props::new().with_ref(node_ref.clone()));
        root.render(&Props::new().with("value", "x").with_ref(node_ref.clone()));
        root.unmount();

        assert_eq!(*seen.borrow(), vec![Some("my-input".to_string()), None]);
    }

    #[test]
    fn cell_ref_tracks_mount_state() {
        let (mut root, created) = root(&input_definition());
        let cell = NodeCell::new();

        root.render(&Props::new().with_ref(&cell));
        let node: Node = created.borrow()[0].clone();
        assert!(Rc::ptr_eq(&cell.current().unwrap(), &node));

        root.unmount();
        assert!(cell.current().is_none());
        assert!(!root.is_mounted());
    }

    #[test]
    fn swapping_caller_ref_moves_the_node() {
        let (mut root, created) = root(&input_definition());
        let first = NodeCell::new();
        let second = NodeCell::new();

        root.render(&Props::new().with_ref(&first));
        root.render(&Props::new().with_ref(&second));

        let node: Node = created.borrow()[0].clone();
        assert!(first.current().is_none());
        assert!(Rc::ptr_eq(&second.current().unwrap(), &node));
        assert!(Rc::ptr_eq(&root.component().node().unwrap(), &node));
    }

    #[test]
    fn remount_writes_props_to_the_new_node() {
        let (mut root, created) = root(&input_definition());
        let cell = NodeCell::new();
        let props = Props::new()
            .with("value", "a")
            .with_handler("onChanged", |_| {})
            .with_ref(&cell);

        root.render(&props);
        root.unmount();
        assert!(root.component().node().is_none());
        assert!(cell.current().is_none());

        root.render(&props);
        assert_eq!(created.borrow().len(), 2);
        let second = created.borrow()[1].clone();
        assert_eq!(second.property("value"), PropValue::from("a"));
        assert_eq!(second.listeners("changed").len(), 1);

        let node: Node = second.clone();
        assert!(Rc::ptr_eq(&root.component().node().unwrap(), &node));
        assert!(Rc::ptr_eq(&cell.current().unwrap(), &node));
    }

    #[test]
    fn registry_forgets_dropped_nodes() {
        let (mut root, created) = root(&input_definition());
        root.render(&Props::new().with_handler("onChanged", |_| {}));
        let weak = Rc::downgrade(&created.borrow()[0]);

        root.unmount();
        drop(root);
        created.borrow_mut().clear();

        assert!(weak.upgrade().is_none());
        with_registry(|r| r.prune());
        assert!(with_registry(|r| r.is_empty()));
    }
}
