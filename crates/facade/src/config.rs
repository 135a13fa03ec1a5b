//! Configuration file (facade.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use facade_adapter::AdapterConfig;
use facade_manifest::ManifestRegistry;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub manifests: ManifestsConfig,
    #[serde(default)]
    pub adapter: AdapterConfig,
}

#[derive(Debug, Deserialize)]
pub struct ManifestsConfig {
    /// Directory scanned for element definitions
    #[serde(default = "default_manifest_dir")]
    pub dir: String,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        Self {
            dir: default_manifest_dir(),
        }
    }
}

fn default_manifest_dir() -> String {
    "elements".to_string()
}

impl ConfigFile {
    /// Manifest directory, relative to the config file's location.
    pub fn manifest_dir(&self, config_path: &Path) -> PathBuf {
        let dir = PathBuf::from(&self.manifests.dir);
        match config_path.parent() {
            Some(parent) if dir.is_relative() => parent.join(dir),
            _ => dir,
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Scan the configured manifest directory.
///
/// A missing directory yields an empty registry.
pub fn load_registry(config: &ConfigFile, config_path: &Path) -> Result<ManifestRegistry> {
    let dir = config.manifest_dir(config_path);
    let mut registry = ManifestRegistry::new();

    if !dir.exists() {
        tracing::warn!("Manifest directory {} does not exist", dir.display());
        return Ok(registry);
    }

    let summary = registry
        .scan(&dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    tracing::debug!(
        "Loaded {} elements from {} files in {}",
        summary.elements,
        summary.files,
        dir.display()
    );
    Ok(registry)
}
