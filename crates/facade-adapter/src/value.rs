//! Dynamic prop values.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value as JsonValue};

use crate::event::{Event, EventHandler};

/// A value passed as a prop and possibly written onto an element.
///
/// Equality is strict equality: primitives compare by value (`NaN` never
/// equals itself), while arrays, objects and handlers compare by identity.
#[derive(Debug, Clone, Default)]
pub enum PropValue {
    /// Absent prop
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Shared array payload
    Array(Rc<Vec<JsonValue>>),
    /// Shared object payload
    Object(Rc<Map<String, JsonValue>>),
    /// Event handler function
    Handler(EventHandler),
}

impl PropValue {
    /// Create a handler value from a closure.
    pub fn handler(f: impl Fn(&Event) + 'static) -> Self {
        Self::Handler(EventHandler::new(f))
    }

    /// Convert a JSON value, giving arrays and objects a fresh identity.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(Rc::new(items)),
            JsonValue::Object(map) => Self::Object(Rc::new(map)),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The handler, if this value is callable.
    pub fn as_handler(&self) -> Option<EventHandler> {
        match self {
            Self::Handler(h) => Some(h.clone()),
            _ => None,
        }
    }

    /// Strict (`===`) equality.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Handler(a), Self::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Serialized attribute form, or `None` when the attribute should be absent.
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(_) => Some(self.to_string()),
            Self::Bool(true) => Some(String::new()),
            _ => None,
        }
    }

    /// Short type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Handler(_) => "function",
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                write!(f, "{}", JsonValue::Array(items.as_ref().clone()))
            }
            Self::Object(map) => write!(f, "{}", JsonValue::Object(map.as_ref().clone())),
            Self::Handler(_) => f.write_str("[function]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<EventHandler> for PropValue {
    fn from(h: EventHandler) -> Self {
        Self::Handler(h)
    }
}

impl From<JsonValue> for PropValue {
    fn from(value: JsonValue) -> Self {
        Self::from_json(value)
    }
}
