//! Custom Elements Manifest (`custom-elements.json`) import.
//!
//! Only the parts needed to adapt an element are read: custom element
//! declarations with a tag name, their public instance fields and the
//! events they fire. Everything else in the schema is ignored.

use serde::Deserialize;

use facade_adapter::{event_prop_name, ElementDefinition};

use crate::error::ManifestError;

/// File name the manifest is conventionally published under.
pub const MANIFEST_FILE_NAME: &str = "custom-elements.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Package {
    #[serde(default)]
    modules: Vec<Module>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Module {
    #[serde(default)]
    declarations: Vec<Declaration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Declaration {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    custom_element: bool,
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    events: Vec<EventDeclaration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Member {
    kind: String,
    name: String,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    privacy: Option<String>,
    #[serde(default)]
    readonly: bool,
}

impl Member {
    /// Whether callers can assign this member on an instance.
    fn is_assignable_field(&self) -> bool {
        self.kind == "field"
            && !self.is_static
            && !self.readonly
            && !self.name.starts_with('#')
            && !matches!(self.privacy.as_deref(), Some("private" | "protected"))
    }
}

#[derive(Debug, Deserialize)]
struct EventDeclaration {
    #[serde(default)]
    name: Option<String>,
}

/// Read element definitions from a Custom Elements Manifest.
pub fn parse_custom_elements_manifest(
    source: &str,
) -> Result<Vec<ElementDefinition>, ManifestError> {
    let package: Package = serde_json::from_str(source)?;
    let mut definitions = Vec::new();

    for declaration in package.modules.into_iter().flat_map(|m| m.declarations) {
        let Some(tag_name) = declaration.tag_name.filter(|_| declaration.custom_element) else {
            continue;
        };

        let mut definition = ElementDefinition::new(tag_name);
        definition.display_name = declaration.name;

        for member in declaration.members.iter().filter(|m| m.is_assignable_field()) {
            if !definition.properties.contains(&member.name) {
                definition.properties.push(member.name.clone());
            }
        }

        for event in declaration.events.into_iter().filter_map(|e| e.name) {
            definition.events.insert(event_prop_name(&event), event);
        }

        // A field named like an event prop would be routed as the event anyway.
        let events = &definition.events;
        definition.properties.retain(|p| !events.contains_key(p));

        definition.validate()?;
        definitions.push(definition);
    }

    Ok(definitions)
}
