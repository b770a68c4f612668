//! External collaborators of a configuration session.
//!
//! Each trait covers one remote concern. [`crate::http::ApiClient`]
//! implements all of them over the REST API; tests substitute in-memory
//! fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::ProcessingFunction;
use crate::device::DeviceKind;
use crate::draft::ConfigDraft;
use crate::error::SourceError;
use crate::gateway::Gateway;
use crate::merge::LiveReadings;

/// Result type for collaborator calls.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Live attribute readings of a device.
#[async_trait]
pub trait DeviceDataSource: Send + Sync {
    async fn fetch_readings(&self, device_id: &str, kind: DeviceKind)
        -> SourceResult<LiveReadings>;

    async fn delete_device(&self, device_id: &str, kind: DeviceKind) -> SourceResult<()>;
}

/// Persisted device configurations.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Saved configuration of one device, if any.
    async fn fetch_config(&self, device_id: &str) -> SourceResult<Option<ConfigDraft>>;

    /// Every saved configuration.
    async fn list_configs(&self) -> SourceResult<Vec<ConfigDraft>>;

    async fn save_config(&self, draft: &ConfigDraft) -> SourceResult<()>;

    async fn delete_config(&self, config_id: &str) -> SourceResult<()>;
}

/// Available processing functions.
#[async_trait]
pub trait FunctionCatalogSource: Send + Sync {
    async fn fetch_functions(&self) -> SourceResult<Vec<ProcessingFunction>>;
}

/// Registered LoRa gateways.
#[async_trait]
pub trait GatewayStore: Send + Sync {
    async fn list_gateways(&self) -> SourceResult<Vec<Gateway>>;

    async fn add_gateway(&self, gateway: &Gateway) -> SourceResult<()>;

    async fn delete_gateway(&self, gateway_id: &str) -> SourceResult<()>;
}

/// Naming convention requested from the name-suggestion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFormat {
    #[default]
    Camel,
    Snake,
    Pascal,
    Kebab,
}

impl CaseFormat {
    pub const ALL: [CaseFormat; 4] = [Self::Camel, Self::Snake, Self::Pascal, Self::Kebab];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camel => "camel",
            Self::Snake => "snake",
            Self::Pascal => "pascal",
            Self::Kebab => "kebab",
        }
    }
}

impl std::fmt::Display for CaseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid case format '{}', expected one of: camel, snake, pascal, kebab",
                    s
                )
            })
    }
}

/// One entry of a name-suggestion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSuggestion {
    pub suggestion: String,
}

/// Body returned by the name-suggestion service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<NameSuggestion>,
}

/// Service proposing human-friendly labels for raw attribute names.
#[async_trait]
pub trait NameSuggester: Send + Sync {
    /// One suggestion per input name, in input order.
    async fn suggest_names(
        &self,
        names: &[String],
        format: CaseFormat,
    ) -> SourceResult<Vec<String>>;
}
