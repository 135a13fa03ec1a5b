//! Errors raised while loading element definitions.

use std::path::PathBuf;

use facade_adapter::DefinitionError;

/// Errors that can occur when reading manifests.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML definitions: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid custom elements manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("<{tag}> is defined twice: {first} and {second}")]
    DuplicateTag {
        tag: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Manifest directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Unsupported manifest file: {0}")]
    Unsupported(String),
}
