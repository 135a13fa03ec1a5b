//! Manifest validation command.

use std::path::Path;

use anyhow::Result;
use facade_manifest::ManifestRegistry;

use crate::config::load_config;

/// Run the check command.
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let dir = config.manifest_dir(config_path);

    let mut registry = ManifestRegistry::new();
    let summary = registry.scan(&dir)?;

    tracing::info!(
        "Checked {} elements in {} files under {}",
        summary.elements,
        summary.files,
        dir.display()
    );

    if !summary.skipped.is_empty() {
        for (path, reason) in &summary.skipped {
            tracing::error!("{}: {}", path.display(), reason);
        }
        anyhow::bail!("{} manifest files failed to load", summary.skipped.len());
    }

    Ok(())
}
