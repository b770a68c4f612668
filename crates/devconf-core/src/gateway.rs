//! LoRa gateways registered with the backend.
//!
//! The backend has no gateway listing of its own: gateway ids come from the
//! device inventory (`GET /devices`, `lora.gateways`). Registration sends an
//! id and a display name.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, Result};
use crate::source::GatewayStore;

/// Length of a gateway EUI in hex digits.
pub const GATEWAY_ID_LEN: usize = 16;

/// A LoRa gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub gateway_id: String,
    /// Only known for gateways registered through this client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Gateway {
    pub fn new(gateway_id: impl Into<String>) -> Self {
        Self {
            gateway_id: gateway_id.into(),
            name: None,
        }
    }

    /// Validate operator input for a new gateway.
    ///
    /// The id is normalized with [`normalize_gateway_id`] and must then be
    /// exactly 16 hex digits; the name must not be blank.
    pub fn register(gateway_id: &str, name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation("gateway name is required".to_string()));
        }
        let gateway_id = validate_gateway_id(gateway_id)?;
        Ok(Self {
            gateway_id,
            name: Some(name.to_string()),
        })
    }
}

/// Strip separators (whitespace, `:`, `-`) and a leading `0x` from a
/// gateway id. Letter case is kept.
pub fn normalize_gateway_id(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();
    compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact)
        .to_string()
}

fn validate_gateway_id(raw: &str) -> Result<String> {
    let gateway_id = normalize_gateway_id(raw);
    if gateway_id.is_empty() {
        return Err(ConfigError::Validation("gateway id is required".to_string()));
    }
    if gateway_id.len() != GATEWAY_ID_LEN || !gateway_id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Validation(format!(
            "gateway id must be a {}-character hex string, got '{}'",
            GATEWAY_ID_LEN, raw
        )));
    }
    Ok(gateway_id)
}

/// Body of `GET /devices`. Only the parts this client reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceInventory {
    #[serde(default)]
    pub lora: Option<LoraInventory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoraInventory {
    #[serde(default)]
    pub gateways: Vec<String>,
}

impl DeviceInventory {
    /// Registered gateways, in inventory order.
    pub fn gateways(self) -> Vec<Gateway> {
        self.lora
            .map(|lora| lora.gateways.into_iter().map(Gateway::new).collect())
            .unwrap_or_default()
    }
}

/// All registered gateways.
pub async fn list_gateways(store: &dyn GatewayStore) -> Result<Vec<Gateway>> {
    store
        .list_gateways()
        .await
        .map_err(|e| ConfigError::operation("List gateways", e))
}

/// Validate and register a gateway. Nothing is sent when validation fails.
pub async fn add_gateway(store: &dyn GatewayStore, gateway_id: &str, name: &str) -> Result<Gateway> {
    let gateway = Gateway::register(gateway_id, name)?;
    store
        .add_gateway(&gateway)
        .await
        .map_err(|e| ConfigError::operation("Add gateway", e))?;
    info!(gateway_id = %gateway.gateway_id, "Gateway added");
    Ok(gateway)
}

pub async fn delete_gateway(store: &dyn GatewayStore, gateway_id: &str) -> Result<()> {
    let gateway_id = normalize_gateway_id(gateway_id);
    if gateway_id.is_empty() {
        return Err(ConfigError::Validation("gateway id is required".to_string()));
    }
    store
        .delete_gateway(&gateway_id)
        .await
        .map_err(|e| ConfigError::operation("Delete gateway", e))?;
    info!(gateway_id = %gateway_id, "Gateway deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_gateway_id() {
        assert_eq!(normalize_gateway_id("0xA84041FFFF1E2B3C"), "A84041FFFF1E2B3C");
        assert_eq!(normalize_gateway_id(" a8:40:41:ff:ff:1e:2b:3c "), "a84041ffff1e2b3c");
        assert_eq!(normalize_gateway_id("A840-41FF-FF1E-2B3C"), "A84041FFFF1E2B3C");
        assert_eq!(normalize_gateway_id("  "), "");
    }

    #[test]
    fn test_register_validates_input() {
        let gateway = Gateway::register("0xa84041ffff1e2b3c", " Roof ").unwrap();
        assert_eq!(gateway.gateway_id, "a84041ffff1e2b3c");
        assert_eq!(gateway.name.as_deref(), Some("Roof"));

        for (id, name) in [
            ("a84041ffff1e2b3c", "  "),
            ("", "Roof"),
            ("a84041ffff1e2b", "Roof"),
            ("a84041ffff1e2b3g", "Roof"),
        ] {
            assert!(matches!(
                Gateway::register(id, name),
                Err(ConfigError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_inventory_gateways() {
        let inventory: DeviceInventory = serde_json::from_value(json!({
            "zigbee": {"devices": ["0xa1"], "coordinators": "0x00"},
            "lora": {"devices": ["n1"], "gateways": ["a84041ffff1e2b3c", "b84041ffff1e2b3c"]}
        }))
        .unwrap();
        let gateways = inventory.gateways();
        assert_eq!(gateways.len(), 2);
        assert_eq!(gateways[1], Gateway::new("b84041ffff1e2b3c"));

        let empty: DeviceInventory = serde_json::from_value(json!({"zigbee": {}})).unwrap();
        assert!(empty.gateways().is_empty());
    }

    #[test]
    fn test_gateway_wire_shape() {
        let gateway = Gateway::register("a84041ffff1e2b3c", "Roof").unwrap();
        assert_eq!(
            serde_json::to_value(&gateway).unwrap(),
            json!({"gateway_id": "a84041ffff1e2b3c", "name": "Roof"})
        );
        assert_eq!(
            serde_json::to_value(Gateway::new("x")).unwrap(),
            json!({"gateway_id": "x"})
        );
    }
}
