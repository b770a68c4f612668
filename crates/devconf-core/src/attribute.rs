//! Device attribute records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::inference::infer_type;
use crate::value::AttributeValue;

/// Semantic type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int,
    Float,
    Bool,
    Null,
    /// Value could not be classified (non-finite number, array, object).
    Unresolved,
}

impl AttributeType {
    /// Default downstream role for attributes of this type.
    pub fn default_option(self) -> AttributeOption {
        match self {
            Self::String => AttributeOption::Tag,
            Self::Int | Self::Float | Self::Bool => AttributeOption::Field,
            Self::Null | Self::Unresolved => AttributeOption::Ignore,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downstream role of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeOption {
    Tag,
    Field,
    #[default]
    Ignore,
}

impl AttributeOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Field => "field",
            Self::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for AttributeOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttributeOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tag" => Ok(Self::Tag),
            "field" => Ok(Self::Field),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "invalid option '{}', expected one of: tag, field, ignore",
                other
            )),
        }
    }
}

/// One field of a device's reported state together with its customization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Unique key within a configuration's attribute list
    pub name: String,
    /// Last observed value; absent if never seen live
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub value: Option<AttributeValue>,
    /// Derived from `value`; left off the wire when it cannot be classified
    #[serde(rename = "type", default, skip_serializing_if = "is_untyped")]
    pub attr_type: Option<AttributeType>,
    #[serde(default)]
    pub option: AttributeOption,
    /// Custom label; `None` means no override
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub rename: Option<String>,
    /// Assigned processing function; `None` means none explicitly chosen
    #[serde(default)]
    pub proc: Option<String>,
}

// A present `null` is an observed null value, not a missing one.
fn present_value<'de, D>(deserializer: D) -> Result<Option<AttributeValue>, D::Error>
where
    D: Deserializer<'de>,
{
    AttributeValue::deserialize(deserializer).map(Some)
}

// Stored configurations carry `""` for a cleared rename.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_rename)
}

fn is_untyped(attr_type: &Option<AttributeType>) -> bool {
    matches!(attr_type, None | Some(AttributeType::Unresolved))
}

impl Attribute {
    /// Create an attribute with no observed value and default customization.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            attr_type: None,
            option: AttributeOption::Ignore,
            rename: None,
            proc: None,
        }
    }

    /// Create an attribute from a live reading; the type is inferred.
    pub fn observed(name: impl Into<String>, value: AttributeValue) -> Self {
        let attr_type = Some(infer_type(&value));
        Self {
            name: name.into(),
            value: Some(value),
            attr_type,
            ..Self::new("")
        }
    }

    pub fn with_option(mut self, option: AttributeOption) -> Self {
        self.option = option;
        self
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = normalize_rename(Some(rename.into()));
        self
    }

    pub fn with_proc(mut self, proc: impl Into<String>) -> Self {
        self.proc = Some(proc.into());
        self
    }

    /// Label shown for this attribute: the rename if set, otherwise the name.
    pub fn display_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }
}

/// Blank or whitespace-only renames mean "no override".
pub fn normalize_rename(rename: Option<String>) -> Option<String> {
    rename.filter(|r| !r.trim().is_empty())
}
