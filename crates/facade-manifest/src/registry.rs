//! Registry of element definitions loaded from a manifest directory.
//!
//! Scans a directory for TOML definition files and `custom-elements.json`
//! manifests, and provides lookup by tag name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use facade_adapter::ElementDefinition;

use crate::cem::{parse_custom_elements_manifest, MANIFEST_FILE_NAME};
use crate::definitions::{is_definition_source, parse_definitions};
use crate::error::ManifestError;

/// Kinds of file the registry understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `[[element]]` tables in a `.toml` file. During a scan, TOML files
    /// without them are passed over.
    Toml,
    /// A `custom-elements.json` manifest
    CustomElements,
}

impl ManifestKind {
    /// Detect the kind of a file from its name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if file_name == MANIFEST_FILE_NAME {
            return Some(Self::CustomElements);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// A definition together with the file it came from.
#[derive(Debug, Clone)]
pub struct RegisteredElement {
    pub definition: ElementDefinition,

    /// Source file path
    pub source_path: PathBuf,
}

/// Outcome of a directory scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Manifest files read successfully
    pub files: usize,

    /// Elements registered
    pub elements: usize,

    /// Files (or definitions) that could not be registered, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Element definitions keyed by lowercase tag name.
#[derive(Debug, Default)]
pub struct ManifestRegistry {
    elements: BTreeMap<String, RegisteredElement>,
}

impl ManifestRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a directory for manifests and populate the registry.
    ///
    /// Files that fail to load are skipped with a warning and listed in the
    /// returned summary.
    pub fn scan(&mut self, dir: &Path) -> Result<ScanSummary, ManifestError> {
        if !dir.exists() {
            return Err(ManifestError::DirectoryNotFound(dir.display().to_string()));
        }

        let mut summary = ScanSummary::default();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let Some(kind) = ManifestKind::from_path(path) else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let loaded = read_source(path).and_then(|source| {
                if kind == ManifestKind::Toml && !is_definition_source(&source) {
                    return Ok(None);
                }
                self.load_source(kind, &source, path).map(Some)
            });

            match loaded {
                Ok(None) => {
                    tracing::debug!("Ignoring {}: no [[element]] tables", path.display());
                }
                Ok(Some(count)) => {
                    tracing::debug!("Loaded {} elements from {}", count, path.display());
                    summary.files += 1;
                    summary.elements += count;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    summary.skipped.push((path.to_path_buf(), e.to_string()));
                }
            }
        }

        Ok(summary)
    }

    /// Load one manifest file. Returns the number of elements registered.
    ///
    /// Nothing is registered if any definition in the file is rejected.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ManifestError> {
        let kind = ManifestKind::from_path(path)
            .ok_or_else(|| ManifestError::Unsupported(path.display().to_string()))?;

        let source = read_source(path)?;
        self.load_source(kind, &source, path)
    }

    fn load_source(
        &mut self,
        kind: ManifestKind,
        source: &str,
        path: &Path,
    ) -> Result<usize, ManifestError> {
        let definitions = match kind {
            ManifestKind::Toml => parse_definitions(source)?,
            ManifestKind::CustomElements => parse_custom_elements_manifest(source)?,
        };

        for definition in &definitions {
            self.check_unregistered(&definition.tag_name, path)?;
        }

        let count = definitions.len();
        for definition in definitions {
            self.insert(definition, path.to_path_buf());
        }
        Ok(count)
    }

    /// Register a single definition.
    pub fn register(
        &mut self,
        definition: ElementDefinition,
        source_path: PathBuf,
    ) -> Result<(), ManifestError> {
        definition.validate()?;
        self.check_unregistered(&definition.tag_name, &source_path)?;
        self.insert(definition, source_path);
        Ok(())
    }

    /// Look up an element by tag name (case-insensitive).
    pub fn get(&self, tag_name: &str) -> Option<&RegisteredElement> {
        self.elements.get(&tag_name.to_lowercase())
    }

    /// Look up an element, failing if it is unknown.
    pub fn require(&self, tag_name: &str) -> Result<&ElementDefinition, ManifestError> {
        self.get(tag_name)
            .map(|e| &e.definition)
            .ok_or_else(|| ManifestError::ElementNotFound(tag_name.to_string()))
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.elements.contains_key(&tag_name.to_lowercase())
    }

    /// All registered tag names, sorted.
    pub fn tags(&self) -> Vec<&str> {
        self.elements
            .values()
            .map(|e| e.definition.tag_name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredElement> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn check_unregistered(&self, tag_name: &str, path: &Path) -> Result<(), ManifestError> {
        match self.get(tag_name) {
            Some(existing) => Err(ManifestError::DuplicateTag {
                tag: tag_name.to_string(),
                first: existing.source_path.clone(),
                second: path.to_path_buf(),
            }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, definition: ElementDefinition, source_path: PathBuf) {
        self.elements.insert(
            definition.tag_name.to_lowercase(),
            RegisteredElement {
                definition,
                source_path,
            },
        );
    }
}

fn read_source(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })
}
