//! Per-node registry of installed event listeners.
//!
//! Entries are keyed by node identity and hold the node only weakly, so the
//! registry never extends a node's lifetime. Entries whose node has been
//! dropped are pruned on every mutation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::dom::{node_key, ElementNode, Node};
use crate::event::EventListener;
use crate::value::PropValue;

thread_local! {
    static REGISTRY: RefCell<EventRegistry> = RefCell::new(EventRegistry::default());
}

/// Run `f` against the registry shared by every adapter on this thread.
pub fn with_registry<R>(f: impl FnOnce(&mut EventRegistry) -> R) -> R {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

/// Listener objects installed on each live node, by event name.
#[derive(Debug, Default)]
pub struct EventRegistry {
    entries: HashMap<usize, NodeListeners>,
}

#[derive(Debug)]
struct NodeListeners {
    node: Weak<dyn ElementNode>,
    listeners: HashMap<String, Rc<EventListener>>,
}

impl EventRegistry {
    /// The listener installed on `node` for `event`, if any.
    pub fn listener(&self, node: &Node, event: &str) -> Option<Rc<EventListener>> {
        self.entry(node)?.listeners.get(event).cloned()
    }

    /// Record the listener installed on `node` for `event`.
    pub fn insert(&mut self, node: &Node, event: &str, listener: Rc<EventListener>) {
        self.prune();
        self.entries
            .entry(node_key(node))
            .or_insert_with(|| NodeListeners {
                node: Rc::downgrade(node),
                listeners: HashMap::new(),
            })
            .listeners
            .insert(event.to_string(), listener);
    }

    /// Forget the listener for `event`, dropping the node's entry once empty.
    pub fn remove(&mut self, node: &Node, event: &str) -> Option<Rc<EventListener>> {
        let key = node_key(node);
        let entry = self.entries.get_mut(&key)?;
        let removed = entry.listeners.remove(event);
        if entry.listeners.is_empty() {
            self.entries.remove(&key);
        }
        self.prune();
        removed
    }

    /// Event names with a listener on `node`.
    pub fn events(&self, node: &Node) -> Vec<String> {
        let mut events: Vec<String> = self
            .entry(node)
            .map(|e| e.listeners.keys().cloned().collect())
            .unwrap_or_default();
        events.sort();
        events
    }

    /// Number of nodes with at least one listener.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose node no longer exists. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.node.strong_count() > 0);
        before - self.entries.len()
    }

    fn entry(&self, node: &Node) -> Option<&NodeListeners> {
        self.entries
            .get(&node_key(node))
            .filter(|e| e.node.strong_count() > 0)
    }
}

/// Install, update or remove the listener for `event` on `node`.
///
/// An existing listener gets its handler swapped in place; an undefined
/// value removes it. Values that are not functions install a listener that
/// invokes nothing.
pub fn bind_event(node: &Node, event: &str, value: &PropValue) {
    let existing = with_registry(|r| r.listener(node, event));

    match existing {
        Some(listener) if value.is_undefined() => {
            node.remove_event_listener(event, &listener);
            with_registry(|r| r.remove(node, event));
            tracing::debug!(tag = node.tag_name(), event, "removed listener");
        }
        Some(listener) => {
            listener.replace(handler_of(event, value));
            tracing::debug!(tag = node.tag_name(), event, "updated listener");
        }
        None if value.is_undefined() => {}
        None => {
            let listener = EventListener::new(handler_of(event, value));
            node.add_event_listener(event, Rc::clone(&listener));
            with_registry(|r| r.insert(node, event, listener));
            tracing::debug!(tag = node.tag_name(), event, "added listener");
        }
    }
}

fn handler_of(event: &str, value: &PropValue) -> Option<crate::event::EventHandler> {
    let handler = value.as_handler();
    if handler.is_none() {
        tracing::debug!(
            event,
            kind = value.type_name(),
            "event prop is not a function, listener will not invoke anything"
        );
    }
    handler
}
