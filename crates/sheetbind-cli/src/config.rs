//! Binding files.
//!
//! A binding file is JSON of the form
//!
//! ```json
//! {
//!   "bindings": [{ "property": "Address.City", "column": "City", "default": "Oslo" }],
//!   "columns": { "Id": "Employee ID" },
//!   "required": ["Id"]
//! }
//! ```
//!
//! Every key is optional. `bindings` come first in resolution order, then the
//! flat `columns` entries in file order.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use sheetbind_model::{BindingSet, ModelError, PropertyPath, RequiredFields};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    #[serde(default)]
    pub bindings: BindingSet,
    /// Flat property name to column name.
    #[serde(default)]
    pub columns: IndexMap<String, String>,
    #[serde(default)]
    pub required: RequiredFields,
}

impl BindingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read binding file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("invalid binding file {}", path.display()))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Ordered bindings followed by the flat column map.
    pub fn binding_set(&self) -> std::result::Result<BindingSet, ModelError> {
        let mut set = self.bindings.clone();
        set.extend(BindingSet::flat(
            self.columns
                .iter()
                .map(|(property, column)| (property.as_str(), column.as_str())),
        )?);
        Ok(set)
    }

    /// Required fields from the file plus `extra` paths from the command line.
    pub fn required_fields(
        &self,
        extra: &[String],
    ) -> std::result::Result<RequiredFields, ModelError> {
        let mut required = self.required.clone();
        for raw in extra {
            required.insert(PropertyPath::parse(raw)?);
        }
        Ok(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_bindings_precede_flat_columns() {
        let config = BindingConfig::from_json(
            r#"{
                "bindings": [{"property": "Address.City", "column": "City", "default": "Oslo"}],
                "columns": {"Name": "Full Name", "Id": "ID"}
            }"#,
        )
        .unwrap();
        let set = config.binding_set().unwrap();
        let columns: Vec<&str> = set.iter().map(|binding| binding.column()).collect();
        assert_eq!(columns, ["City", "Full Name", "ID"]);
        assert!(set.get(0).and_then(|binding| binding.static_value()).is_some());
    }

    #[test]
    fn command_line_required_fields_are_merged() {
        let config = BindingConfig::from_json(r#"{"required": ["Id"]}"#).unwrap();
        let required = config
            .required_fields(&["name".to_string(), "ID".to_string()])
            .unwrap();
        assert_eq!(required.iter().count(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(BindingConfig::from_json(r#"{"mappings": {}}"#).is_err());
    }

    #[test]
    fn empty_document_is_valid() {
        let config = BindingConfig::from_json("{}").unwrap();
        assert!(config.binding_set().unwrap().is_empty());
    }
}
