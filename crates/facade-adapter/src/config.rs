//! Adapter configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// Settings shared by every component an [`ElementAdapter`](crate::ElementAdapter) creates.
///
/// Loaded from the `[adapter]` table of `facade.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Prop names owned by the host framework; never written to the element
    #[serde(default = "default_reserved")]
    pub reserved: BTreeSet<String>,

    /// Host attribute names for reserved props (e.g. `className` -> `class`)
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
}

fn default_reserved() -> BTreeSet<String> {
    ["children", "localName", "ref", "style", "className"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("className".to_string(), "class".to_string())])
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            reserved: default_reserved(),
            aliases: default_aliases(),
        }
    }
}

impl AdapterConfig {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// The name a prop is forwarded to the host under.
    pub fn host_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}
