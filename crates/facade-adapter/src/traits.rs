//! Trait definitions for components driven by a host framework.

use std::collections::BTreeMap;

use crate::props::Props;
use crate::refs::RefCallback;
use crate::value::PropValue;

/// What a component hands back to the host on each render.
#[derive(Debug, Clone)]
pub struct RenderedElement {
    /// Tag of the host element to create (e.g., "my-input")
    pub tag_name: String,

    /// Props left to the host's own attribute handling
    pub props: BTreeMap<String, PropValue>,

    /// Ref the host must attach to the created node
    pub node_ref: RefCallback,
}

/// A component instance driven by a host reconciliation loop.
///
/// The host calls `render` with the current props, attaches the returned
/// ref to the node, then calls `did_mount` after the first commit and
/// `did_update` after each later one. `will_unmount` runs before the node is
/// dropped; a later render starts a fresh mount. Calls are never concurrent.
pub trait HostComponent {
    /// Display name used in diagnostics
    fn name(&self) -> &str;

    /// Describe the element to render for `props`.
    fn render(&mut self, props: &Props) -> RenderedElement;

    /// Called once the node exists for the first time.
    fn did_mount(&mut self);

    /// Called after every subsequent commit.
    fn did_update(&mut self);

    /// Called before the node is detached and dropped.
    fn will_unmount(&mut self);
}
