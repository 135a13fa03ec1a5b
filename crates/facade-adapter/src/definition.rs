//! Declarations of the custom elements to adapt.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// What an adapter needs to know about a custom element.
///
/// `properties` lists the element-specific properties (those not present on
/// every `HTMLElement`); `events` maps a prop name to the DOM event it listens
/// for (e.g. `onChanged` -> `changed`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ElementDefinition {
    /// Custom element tag name (e.g., "my-input")
    pub tag_name: String,

    /// Component name shown in diagnostics; derived from the tag when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Element-specific property names
    #[serde(default)]
    pub properties: Vec<String>,

    /// Event prop name -> DOM event name
    #[serde(default)]
    pub events: BTreeMap<String, String>,
}

impl ElementDefinition {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style property declaration.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    /// Builder-style event declaration.
    pub fn event(mut self, prop: impl Into<String>, event: impl Into<String>) -> Self {
        self.events.insert(prop.into(), event.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The display name, falling back to the PascalCase tag name.
    pub fn name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| to_pascal_case(&self.tag_name))
    }

    /// Check the definition for names a browser or adapter would reject.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if RESERVED_TAG_NAMES.contains(&self.tag_name.as_str()) {
            return Err(DefinitionError::ReservedTagName(self.tag_name.clone()));
        }
        if !is_valid_custom_element_name(&self.tag_name) {
            return Err(DefinitionError::InvalidTagName(self.tag_name.clone()));
        }

        for name in &self.properties {
            if name.trim().is_empty() {
                return Err(DefinitionError::EmptyName {
                    tag: self.tag_name.clone(),
                });
            }
            if self.events.contains_key(name) {
                return Err(DefinitionError::PropertyEventConflict {
                    tag: self.tag_name.clone(),
                    name: name.clone(),
                });
            }
        }

        for (prop, event) in &self.events {
            if prop.trim().is_empty() {
                return Err(DefinitionError::EmptyName {
                    tag: self.tag_name.clone(),
                });
            }
            if event.trim().is_empty() {
                return Err(DefinitionError::EmptyEventName {
                    tag: self.tag_name.clone(),
                    prop: prop.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Errors found when validating an [`ElementDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Invalid custom element name: {0}")]
    InvalidTagName(String),

    #[error("Reserved element name cannot be used for a custom element: {0}")]
    ReservedTagName(String),

    #[error("<{tag}> declares '{name}' both as a property and as an event prop")]
    PropertyEventConflict { tag: String, name: String },

    #[error("<{tag}> declares an empty property or event prop name")]
    EmptyName { tag: String },

    #[error("<{tag}> maps event prop '{prop}' to an empty event name")]
    EmptyEventName { tag: String, prop: String },
}

// Names the HTML standard set aside before custom elements existed.
const RESERVED_TAG_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

static TAG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9._]*-[a-z0-9._-]*$").expect("Invalid tag name regex")
});

/// Whether `name` can be registered as a custom element.
pub fn is_valid_custom_element_name(name: &str) -> bool {
    TAG_NAME_RE.is_match(name) && !RESERVED_TAG_NAMES.contains(&name)
}

/// The conventional prop name for a DOM event: `value-changed` -> `onValueChanged`.
pub fn event_prop_name(event: &str) -> String {
    let mut prop = String::from("on");
    prop.push_str(&to_pascal_case(event));
    prop
}

/// Convert kebab-, snake- or dot-separated words to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_', '.', ':'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_tag_names() {
        assert!(is_valid_custom_element_name("my-input"));
        assert!(is_valid_custom_element_name("x-1"));
        assert!(is_valid_custom_element_name("md-filled.button-2"));
        assert!(!is_valid_custom_element_name("input"));
        assert!(!is_valid_custom_element_name("My-Input"));
        assert!(!is_valid_custom_element_name("-input"));
        assert!(!is_valid_custom_element_name("1-input"));
        assert!(!is_valid_custom_element_name("font-face"));
    }

    #[test]
    fn rejects_conflicting_declarations() {
        let def = ElementDefinition::new("my-input")
            .property("onChanged")
            .event("onChanged", "changed");

        assert_eq!(
            def.validate(),
            Err(DefinitionError::PropertyEventConflict {
                tag: "my-input".into(),
                name: "onChanged".into()
            })
        );
    }

    #[test]
    fn rejects_bad_names() {
        assert!(matches!(
            ElementDefinition::new("font-face").validate(),
            Err(DefinitionError::ReservedTagName(_))
        ));
        assert!(matches!(
            ElementDefinition::new("input").validate(),
            Err(DefinitionError::InvalidTagName(_))
        ));
        assert!(matches!(
            ElementDefinition::new("my-input").event("onChanged", " ").validate(),
            Err(DefinitionError::EmptyEventName { .. })
        ));
        assert!(matches!(
            ElementDefinition::new("my-input").property("").validate(),
            Err(DefinitionError::EmptyName { .. })
        ));
    }

    #[test]
    fn derives_names() {
        let def = ElementDefinition::new("my-input");
        assert_eq!(def.name(), "MyInput");
        assert_eq!(def.with_display_name("TextField").name(), "TextField");

        assert_eq!(event_prop_name("changed"), "onChanged");
        assert_eq!(event_prop_name("value-changed"), "onValueChanged");
        assert_eq!(event_prop_name("sl_select"), "onSlSelect");
    }
}
