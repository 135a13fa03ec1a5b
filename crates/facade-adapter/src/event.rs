//! DOM events, handler functions and listener objects.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value as JsonValue;

/// An event dispatched on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event type (e.g., "changed")
    pub event_type: String,

    /// Payload carried by the event (`CustomEvent.detail`)
    pub detail: JsonValue,
}

impl Event {
    /// Create an event without a payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::with_detail(event_type, JsonValue::Null)
    }

    /// Create an event carrying a payload.
    pub fn with_detail(event_type: impl Into<String>, detail: JsonValue) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
        }
    }
}

/// A unary event handler function.
///
/// Handlers compare by identity: two handlers are the same only if they
/// share the same allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    /// Wrap a closure as an event handler.
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Whether both handles point at the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A listener object registered with an element.
///
/// The element holds on to the object, not to the handler, so the handler
/// can be swapped without removing and re-adding the listener.
#[derive(Debug, Default)]
pub struct EventListener {
    handler: RefCell<Option<EventHandler>>,
}

impl EventListener {
    /// Create a listener invoking `handler`.
    pub fn new(handler: Option<EventHandler>) -> Rc<Self> {
        Rc::new(Self {
            handler: RefCell::new(handler),
        })
    }

    /// Deliver an event to the current handler.
    pub fn handle_event(&self, event: &Event) {
        // Release the borrow first: the handler may replace itself.
        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            handler.call(event);
        }
    }

    /// Swap the invoked handler in place.
    pub fn replace(&self, handler: Option<EventHandler>) {
        *self.handler.borrow_mut() = handler;
    }

    /// The handler currently invoked by this listener.
    pub fn handler(&self) -> Option<EventHandler> {
        self.handler.borrow().clone()
    }
}
