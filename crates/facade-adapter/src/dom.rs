//! DOM abstraction and an in-memory element implementation.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::event::{Event, EventListener};
use crate::value::PropValue;

/// The subset of the DOM `Element` interface the adapter drives.
pub trait ElementNode: fmt::Debug {
    /// Lowercase tag name of the element
    fn tag_name(&self) -> &str;

    /// Assign a live property (`node[name] = value`).
    fn set_property(&self, name: &str, value: PropValue);

    /// Read a live property.
    fn property(&self, name: &str) -> PropValue;

    fn set_attribute(&self, name: &str, value: &str);

    fn remove_attribute(&self, name: &str);

    /// Register a listener object. Registering the same object twice is a no-op.
    fn add_event_listener(&self, event: &str, listener: Rc<EventListener>);

    fn remove_event_listener(&self, event: &str, listener: &Rc<EventListener>);
}

/// A shared handle to a rendered element.
pub type Node = Rc<dyn ElementNode>;

/// Stable identity key for a node.
pub(crate) fn node_key(node: &Node) -> usize {
    Rc::as_ptr(node) as *const () as usize
}

/// A mutation observed on a [`MemoryElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    SetProperty { name: String, value: PropValue },
    SetAttribute { name: String, value: String },
    RemoveAttribute { name: String },
    AddListener { event: String },
    RemoveListener { event: String },
}

impl fmt::Display for DomOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomOp::SetProperty { name, value } => write!(f, "property {name} = {value}"),
            DomOp::SetAttribute { name, value } => write!(f, "attribute {name}=\"{value}\""),
            DomOp::RemoveAttribute { name } => write!(f, "remove attribute {name}"),
            DomOp::AddListener { event } => write!(f, "add listener '{event}'"),
            DomOp::RemoveListener { event } => write!(f, "remove listener '{event}'"),
        }
    }
}

/// An element living in memory.
///
/// Stores properties, attributes and listeners, and journals every
/// mutation so callers can see exactly what reached the node.
#[derive(Debug)]
pub struct MemoryElement {
    tag_name: String,
    properties: RefCell<BTreeMap<String, PropValue>>,
    attributes: RefCell<BTreeMap<String, String>>,
    listeners: RefCell<Vec<(String, Rc<EventListener>)>>,
    journal: RefCell<Vec<DomOp>>,
}

impl MemoryElement {
    /// Create a detached element.
    pub fn new(tag_name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            properties: RefCell::default(),
            attributes: RefCell::default(),
            listeners: RefCell::default(),
            journal: RefCell::default(),
        })
    }

    /// All mutations so far, oldest first.
    pub fn journal(&self) -> Vec<DomOp> {
        self.journal.borrow().clone()
    }

    /// Drain the journal.
    pub fn take_journal(&self) -> Vec<DomOp> {
        std::mem::take(&mut *self.journal.borrow_mut())
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.attributes.borrow().clone()
    }

    /// Listener objects registered for `event`, in registration order.
    pub fn listeners(&self, event: &str) -> Vec<Rc<EventListener>> {
        self.listeners
            .borrow()
            .iter()
            .filter(|(e, _)| e == event)
            .map(|(_, l)| Rc::clone(l))
            .collect()
    }

    /// Dispatch an event to its listeners and return how many were invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        let targets = self.listeners(&event.event_type);
        for listener in &targets {
            listener.handle_event(event);
        }
        targets.len()
    }

    fn record(&self, op: DomOp) {
        tracing::trace!(tag = %self.tag_name, "{}", op);
        self.journal.borrow_mut().push(op);
    }
}

impl ElementNode for MemoryElement {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn set_property(&self, name: &str, value: PropValue) {
        self.properties
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        self.record(DomOp::SetProperty {
            name: name.to_string(),
            value,
        });
    }

    fn property(&self, name: &str) -> PropValue {
        self.properties
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self.record(DomOp::SetAttribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&self, name: &str) {
        if self.attributes.borrow_mut().remove(name).is_some() {
            self.record(DomOp::RemoveAttribute {
                name: name.to_string(),
            });
        }
    }

    fn add_event_listener(&self, event: &str, listener: Rc<EventListener>) {
        {
            let mut listeners = self.listeners.borrow_mut();
            if listeners
                .iter()
                .any(|(e, l)| e == event && Rc::ptr_eq(l, &listener))
            {
                return;
            }
            listeners.push((event.to_string(), listener));
        }
        self.record(DomOp::AddListener {
            event: event.to_string(),
        });
    }

    fn remove_event_listener(&self, event: &str, listener: &Rc<EventListener>) {
        let removed = {
            let mut listeners = self.listeners.borrow_mut();
            let before = listeners.len();
            listeners.retain(|(e, l)| !(e == event && Rc::ptr_eq(l, listener)));
            before != listeners.len()
        };
        if removed {
            self.record(DomOp::RemoveListener {
                event: event.to_string(),
            });
        }
    }
}
