//! Processing-function catalog.
//!
//! The catalog is fetched once per session. [`FunctionCatalog::new`] appends
//! the synthetic "None" entry so it is present whether or not the fetch
//! succeeded; the resulting value is never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeType;

/// Value class a processing function operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "noneType")]
    NoneType,
}

impl ValueType {
    /// Value class accepted by attributes of the given type, if any.
    pub fn for_attribute(attr_type: AttributeType) -> Option<Self> {
        match attr_type {
            AttributeType::Int | AttributeType::Float => Some(Self::Number),
            AttributeType::String => Some(Self::String),
            AttributeType::Bool => Some(Self::Bool),
            AttributeType::Null | AttributeType::Unresolved => None,
        }
    }
}

/// A named transformation assignable to an attribute's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingFunction {
    /// Identifier; empty for the synthetic none-function
    pub name: String,
    pub display_name: String,
    /// Keywords used for heuristic matching, in declared order
    #[serde(default)]
    pub tags: Vec<String>,
    pub value_type: ValueType,
}

impl ProcessingFunction {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            tags: Vec::new(),
            value_type,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The synthetic "None" entry.
    pub fn none() -> Self {
        Self::new(NONE_FUNCTION_NAME, "None", ValueType::NoneType)
    }

    pub fn is_none(&self) -> bool {
        self.value_type == ValueType::NoneType
    }
}

/// Identifier of the synthetic none-function.
pub const NONE_FUNCTION_NAME: &str = "";

/// Response body of the catalog endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub functions: Vec<ProcessingFunction>,
}

/// Immutable, session-scoped set of processing functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCatalog {
    functions: Vec<ProcessingFunction>,
}

impl FunctionCatalog {
    /// Build the catalog from fetched entries, appending the none-function.
    pub fn new(fetched: Vec<ProcessingFunction>) -> Self {
        let mut functions = fetched;
        functions.push(ProcessingFunction::none());
        Self { functions }
    }

    /// Catalog used when the fetch failed: only the none-function.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// All functions in catalog order, none-function last.
    pub fn functions(&self) -> &[ProcessingFunction] {
        &self.functions
    }

    pub fn get(&self, name: &str) -> Option<&ProcessingFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::empty()
    }
}
