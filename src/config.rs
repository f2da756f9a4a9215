use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{QueriesError, Result};

/// Per-field indexing options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Record in-document term frequencies in postings
    #[serde(default = "default_index_frequencies")]
    pub index_frequencies: bool,
}

fn default_index_frequencies() -> bool {
    true
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            index_frequencies: true,
        }
    }
}

impl FieldOptions {
    /// Options for a field whose postings carry document ids only
    pub fn docs_only() -> Self {
        Self {
            index_frequencies: false,
        }
    }
}

/// Index settings configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Options applied to fields without an explicit entry
    #[serde(default)]
    pub default_field: FieldOptions,
    /// Per-field overrides
    #[serde(default)]
    pub fields: BTreeMap<String, FieldOptions>,
}

impl IndexSettings {
    /// Resolve the options for a field
    pub fn field_options(&self, field: &str) -> &FieldOptions {
        self.fields.get(field).unwrap_or(&self.default_field)
    }

    /// Override the options of a single field
    pub fn with_field(mut self, field: impl Into<String>, options: FieldOptions) -> Self {
        self.fields.insert(field.into(), options);
        self
    }

    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: IndexSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = self.fields.keys().find(|name| name.trim().is_empty()) {
            return Err(QueriesError::InvalidConfig(format!(
                "field name must not be blank: {:?}",
                name
            )));
        }
        Ok(())
    }
}
