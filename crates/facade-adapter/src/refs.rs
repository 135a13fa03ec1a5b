//! Caller-supplied refs to rendered nodes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dom::Node;

/// A callback invoked with the node when it is attached and `None` when detached.
#[derive(Clone)]
pub struct RefCallback(Rc<dyn Fn(Option<Node>)>);

impl RefCallback {
    pub fn new(f: impl Fn(Option<Node>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, node: Option<Node>) {
        (self.0)(node)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RefCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefCallback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A box whose `current` slot holds the attached node.
#[derive(Clone, Default)]
pub struct NodeCell(Rc<RefCell<Option<Node>>>);

impl NodeCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Node> {
        self.0.borrow().clone()
    }

    pub fn set_current(&self, node: Option<Node>) {
        *self.0.borrow_mut() = node;
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCell")
            .field("attached", &self.0.borrow().is_some())
            .finish()
    }
}

/// A ref in one of the two shapes a caller may pass.
#[derive(Debug, Clone)]
pub enum NodeRef {
    Callback(RefCallback),
    Cell(NodeCell),
}

impl NodeRef {
    pub fn callback(f: impl Fn(Option<Node>) + 'static) -> Self {
        Self::Callback(RefCallback::new(f))
    }

    pub fn cell(cell: &NodeCell) -> Self {
        Self::Cell(cell.clone())
    }

    /// Hand the node (or its absence) to the caller.
    pub fn fulfil(&self, node: Option<Node>) {
        match self {
            NodeRef::Callback(cb) => cb.call(node),
            NodeRef::Cell(cell) => cell.set_current(node),
        }
    }

    /// Identity comparison; refs of different shapes are never equal.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeRef::Callback(a), NodeRef::Callback(b)) => a.ptr_eq(b),
            (NodeRef::Cell(a), NodeRef::Cell(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<RefCallback> for NodeRef {
    fn from(cb: RefCallback) -> Self {
        Self::Callback(cb)
    }
}

impl From<&NodeCell> for NodeRef {
    fn from(cell: &NodeCell) -> Self {
        Self::cell(cell)
    }
}
