//! Device kinds and the device listing derived from saved configurations.

use serde::{Deserialize, Serialize};

use crate::draft::ConfigDraft;

/// Radio family a device is attached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Zigbee,
    Lora,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zigbee => "zigbee",
            Self::Lora => "lora",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zigbee" => Ok(Self::Zigbee),
            "lora" => Ok(Self::Lora),
            other => Err(format!(
                "invalid device type '{}', expected one of: zigbee, lora",
                other
            )),
        }
    }
}

/// Listing entry for a configured device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Device identifier
    pub id: String,
    pub name: String,
    /// Persisted configuration id, empty if the store returned none
    pub config_id: String,
    /// `None` for device types this client does not know
    pub kind: Option<DeviceKind>,
}

/// Map saved configuration bodies to device listing entries.
pub fn summarize_configs(configs: &[ConfigDraft]) -> Vec<DeviceSummary> {
    configs
        .iter()
        .map(|config| DeviceSummary {
            id: config.device_id.clone(),
            name: config.name.clone(),
            config_id: config.id.clone().unwrap_or_default(),
            kind: config.device_type.parse().ok(),
        })
        .collect()
}

/// Keep only devices of the given kind; `None` keeps everything.
pub fn filter_by_kind(devices: Vec<DeviceSummary>, kind: Option<DeviceKind>) -> Vec<DeviceSummary> {
    match kind {
        Some(kind) => devices
            .into_iter()
            .filter(|d| d.kind == Some(kind))
            .collect(),
        None => devices,
    }
}
