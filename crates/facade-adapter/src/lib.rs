//! Adapters that make custom elements usable as host framework components.
//!
//! An [`ElementAdapter`] turns an [`ElementDefinition`] into an
//! [`AdaptedComponent`]. Element-specific props are written to the live node
//! as properties, event props become listener objects tracked in a weakly
//! keyed per-node registry, and everything else is left to the host.

pub mod adapter;
pub mod config;
pub mod definition;
pub mod dom;
pub mod event;
pub mod host;
pub mod props;
pub mod refs;
pub mod registry;
pub mod traits;
pub mod value;

pub use adapter::{AdaptedComponent, AdapterInstance, ElementAdapter, PropKind, PropRoute, PropertyMap};
pub use config::AdapterConfig;
pub use definition::{event_prop_name, is_valid_custom_element_name, DefinitionError, ElementDefinition};
pub use dom::{DomOp, ElementNode, MemoryElement, Node};
pub use event::{Event, EventHandler, EventListener};
pub use host::HostRoot;
pub use props::Props;
pub use refs::{NodeCell, NodeRef, RefCallback};
pub use registry::{bind_event, with_registry, EventRegistry};
pub use traits::{HostComponent, RenderedElement};
pub use value::PropValue;
