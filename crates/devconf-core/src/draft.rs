//! Configuration drafts and the edit operations applied to them.

use serde::{Deserialize, Serialize};

use crate::attribute::{normalize_rename, Attribute, AttributeOption};
use crate::error::{ConfigError, Result};

/// Attribute list wrapper, matching the configuration body on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// The full editable configuration of one device.
///
/// Also the body exchanged with the configuration store, so a saved
/// configuration deserializes into the same type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDraft {
    pub device_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub config: AttributeConfig,
    /// Persisted configuration id, absent before the first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ConfigDraft {
    pub fn new(device_id: impl Into<String>, device_type: impl Into<String>) -> Self {
        let device_id = device_id.into();
        Self {
            name: device_id.clone(),
            device_id,
            device_type: device_type.into(),
            config: AttributeConfig::default(),
            id: None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.config.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.config.attributes.iter().find(|a| a.name == name)
    }
}

/// Exclusive owner of a draft. Every edit is a synchronous state transition;
/// none perform I/O.
///
/// Edits that target a name not yet in the draft append a fresh attribute
/// (no value, no type, option `ignore`) before applying the change, so an
/// edit is never dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftStore {
    draft: ConfigDraft,
}

impl DraftStore {
    pub fn new(draft: ConfigDraft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &ConfigDraft {
        &self.draft
    }

    /// Replace the draft wholesale (after a save or a reload).
    pub fn replace(&mut self, draft: ConfigDraft) {
        self.draft = draft;
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.draft.attributes()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.draft.attribute(name)
    }

    pub fn set_option(&mut self, name: &str, option: AttributeOption) {
        self.upsert(name).option = option;
    }

    /// Set the custom label. Blank input clears the override.
    pub fn set_rename(&mut self, name: &str, rename: impl Into<String>) {
        self.upsert(name).rename = normalize_rename(Some(rename.into()));
    }

    pub fn set_processing_function(&mut self, name: &str, proc: Option<String>) {
        self.upsert(name).proc = proc;
    }

    /// Clear every customization. Values and types are left as they are.
    pub fn reset_all(&mut self) {
        for attr in &mut self.draft.config.attributes {
            attr.option = AttributeOption::Ignore;
            attr.rename = None;
            attr.proc = None;
        }
    }

    /// Overwrite every option with the default for the attribute's type.
    pub fn apply_type_defaults(&mut self) {
        for attr in &mut self.draft.config.attributes {
            attr.option = attr
                .attr_type
                .map(|t| t.default_option())
                .unwrap_or(AttributeOption::Ignore);
        }
    }

    pub fn set_device_name(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "device name must not be empty".to_string(),
            ));
        }
        self.draft.name = name.to_string();
        Ok(())
    }

    /// Apply `(attribute, suggestion)` pairs as renames.
    pub fn apply_suggestions<I>(&mut self, suggestions: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, suggestion) in suggestions {
            self.set_rename(&name, suggestion);
        }
    }

    fn upsert(&mut self, name: &str) -> &mut Attribute {
        let attributes = &mut self.draft.config.attributes;
        let idx = match attributes.iter().position(|a| a.name == name) {
            Some(idx) => idx,
            None => {
                attributes.push(Attribute::new(name));
                attributes.len() - 1
            }
        };
        &mut attributes[idx]
    }
}
