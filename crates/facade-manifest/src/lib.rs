//! Custom element definitions from manifest files.
//!
//! Reads element declarations from TOML definition files and from Custom
//! Elements Manifests (`custom-elements.json`), and collects them in a
//! registry keyed by tag name.

pub mod cem;
pub mod definitions;
pub mod error;
pub mod registry;

pub use cem::parse_custom_elements_manifest;
pub use definitions::{is_definition_source, parse_definitions};
pub use error::ManifestError;
pub use registry::{ManifestKind, ManifestRegistry, RegisteredElement, ScanSummary};
