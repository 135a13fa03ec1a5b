//! TOML element definition files.
//!
//! ```toml
//! [[element]]
//! tag_name = "my-input"
//! properties = ["value", "options"]
//!
//! [element.events]
//! onChanged = "changed"
//! ```

use serde::Deserialize;

use facade_adapter::ElementDefinition;

use crate::error::ManifestError;

#[derive(Debug, Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    element: Vec<ElementDefinition>,
}

/// Whether `source` declares elements (has a top-level `[[element]]` array).
///
/// Other TOML files, like `facade.toml` or simulation scripts, do not.
/// Unparseable sources count as definition files so their errors surface.
pub fn is_definition_source(source: &str) -> bool {
    match source.parse::<toml::Table>() {
        Ok(table) => matches!(table.get("element"), Some(toml::Value::Array(_))),
        Err(_) => true,
    }
}

/// Parse and validate every `[[element]]` table in `source`.
pub fn parse_definitions(source: &str) -> Result<Vec<ElementDefinition>, ManifestError> {
    let file: DefinitionFile = toml::from_str(source)?;
    for definition in &file.element {
        definition.validate()?;
    }
    Ok(file.element)
}
