//! Props passed to an adapted component.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::event::Event;
use crate::refs::NodeRef;
use crate::value::PropValue;

/// Named prop values plus an optional caller ref.
#[derive(Debug, Clone, Default)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
    node_ref: Option<NodeRef>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style insert of an event handler.
    pub fn with_handler(self, name: impl Into<String>, f: impl Fn(&Event) + 'static) -> Self {
        self.with(name, PropValue::handler(f))
    }

    pub fn with_ref(mut self, node_ref: impl Into<NodeRef>) -> Self {
        self.node_ref = Some(node_ref.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    /// The value of `name`, `Undefined` when absent.
    pub fn value(&self, name: &str) -> PropValue {
        self.values.get(name).cloned().unwrap_or_default()
    }

    pub fn node_ref(&self) -> Option<&NodeRef> {
        self.node_ref.as_ref()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PropValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a String, &'a PropValue);
    type IntoIter = btree_map::Iter<'a, String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}
