//! REST client for the configuration backend.
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/devices/{type}/{id}` | live readings |
//! | DELETE | `/devices/{type}/{id}` | remove device |
//! | GET | `/config?device_id={id}` | saved configuration (array, first entry used) |
//! | GET | `/config` | all saved configurations |
//! | POST | `/config` | save configuration |
//! | DELETE | `/config/{config_id}` | remove configuration |
//! | GET | `/suggestions/rename?name=..&case=..` | name suggestions |
//! | GET | `/suggestions/proc` | processing-function catalog |
//! | GET | `/devices` | device inventory (gateway ids) |
//! | PUT | `/devices/lora/gateway` | register gateway |
//! | DELETE | `/devices/lora/gateway/{id}` | remove gateway |

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{CatalogResponse, ProcessingFunction};
use crate::config::ApiConfig;
use crate::device::DeviceKind;
use crate::draft::ConfigDraft;
use crate::error::SourceError;
use crate::gateway::{DeviceInventory, Gateway};
use crate::merge::LiveReadings;
use crate::source::{
    CaseFormat, ConfigStore, DeviceDataSource, FunctionCatalogSource, GatewayStore,
    NameSuggester, SourceResult, SuggestionResponse,
};

/// HTTP implementation of every session collaborator.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> SourceResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Client configured from the environment.
    pub fn from_env() -> SourceResult<Self> {
        Self::new(ApiConfig::from_env())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build an endpoint URL, escaping each path segment.
    fn endpoint(&self, segments: &[&str]) -> SourceResult<Url> {
        let mut url = Url::parse(self.config.base_url())
            .map_err(|e| SourceError::Other(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Other("API base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "API request");
        self.client.request(method, url)
    }

    async fn send(request: RequestBuilder) -> SourceResult<Response> {
        let response = request.send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> SourceResult<T> {
        let body = Self::send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DeviceDataSource for ApiClient {
    async fn fetch_readings(
        &self,
        device_id: &str,
        kind: DeviceKind,
    ) -> SourceResult<LiveReadings> {
        let url = self.endpoint(&["devices", kind.as_str(), device_id])?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn delete_device(&self, device_id: &str, kind: DeviceKind) -> SourceResult<()> {
        let url = self.endpoint(&["devices", kind.as_str(), device_id])?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for ApiClient {
    async fn fetch_config(&self, device_id: &str) -> SourceResult<Option<ConfigDraft>> {
        let url = self.endpoint(&["config"])?;
        let request = self
            .request(Method::GET, url)
            .query(&[("device_id", device_id)]);
        let configs: Vec<ConfigDraft> = Self::send_json(request).await?;
        Ok(configs.into_iter().next())
    }

    async fn list_configs(&self) -> SourceResult<Vec<ConfigDraft>> {
        let url = self.endpoint(&["config"])?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn save_config(&self, draft: &ConfigDraft) -> SourceResult<()> {
        let url = self.endpoint(&["config"])?;
        Self::send(self.request(Method::POST, url).json(draft)).await?;
        Ok(())
    }

    async fn delete_config(&self, config_id: &str) -> SourceResult<()> {
        let url = self.endpoint(&["config", config_id])?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[async_trait]
impl FunctionCatalogSource for ApiClient {
    async fn fetch_functions(&self) -> SourceResult<Vec<ProcessingFunction>> {
        let url = self.endpoint(&["suggestions", "proc"])?;
        let response: CatalogResponse = Self::send_json(self.request(Method::GET, url)).await?;
        Ok(response.functions)
    }
}

#[async_trait]
impl NameSuggester for ApiClient {
    async fn suggest_names(
        &self,
        names: &[String],
        format: CaseFormat,
    ) -> SourceResult<Vec<String>> {
        let url = self.endpoint(&["suggestions", "rename"])?;
        let mut query: Vec<(&str, &str)> = names.iter().map(|n| ("name", n.as_str())).collect();
        query.push(("case", format.as_str()));

        let response: SuggestionResponse =
            Self::send_json(self.request(Method::GET, url).query(&query)).await?;
        Ok(response
            .suggestions
            .into_iter()
            .map(|s| s.suggestion)
            .collect())
    }
}

#[async_trait]
impl GatewayStore for ApiClient {
    async fn list_gateways(&self) -> SourceResult<Vec<Gateway>> {
        let url = self.endpoint(&["devices"])?;
        let inventory: DeviceInventory = Self::send_json(self.request(Method::GET, url)).await?;
        Ok(inventory.gateways())
    }

    async fn add_gateway(&self, gateway: &Gateway) -> SourceResult<()> {
        let url = self.endpoint(&["devices", "lora", "gateway"])?;
        Self::send(self.request(Method::PUT, url).json(gateway)).await?;
        Ok(())
    }

    async fn delete_gateway(&self, gateway_id: &str) -> SourceResult<()> {
        let url = self.endpoint(&["devices", "lora", "gateway", gateway_id])?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(ApiConfig::new(base)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let api = client("http://127.0.0.1:8080");
        let url = api.endpoint(&["devices", "zigbee", "0x00158d"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/devices/zigbee/0x00158d");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("http://edge.local/api/");
        let url = api.endpoint(&["suggestions", "proc"]).unwrap();
        assert_eq!(url.as_str(), "http://edge.local/api/suggestions/proc");
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let api = client("http://edge.local");
        let url = api.endpoint(&["config", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://edge.local/config/a%2Fb%20c");
    }

    #[test]
    fn test_gateway_endpoint() {
        let api = client("http://edge.local/api");
        let url = api
            .endpoint(&["devices", "lora", "gateway", "a84041ffff1e2b3c"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://edge.local/api/devices/lora/gateway/a84041ffff1e2b3c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let api = client("not a url");
        assert!(matches!(api.endpoint(&["config"]), Err(SourceError::Other(_))));
    }
}
