//! Reconciliation of live device readings with a saved configuration.
//!
//! The device is authoritative for which attributes exist now and what
//! their values are; the saved configuration is authoritative for how the
//! operator customized them. Saved attributes the device no longer reports
//! are kept after the live ones so their history is not lost.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::attribute::Attribute;
use crate::draft::{AttributeConfig, ConfigDraft};
use crate::value::AttributeValue;

/// Live name→value readings, in the order the device reported them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveReadings {
    entries: Vec<(String, AttributeValue)>,
}

impl LiveReadings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading. A repeated name keeps its first position and takes
    /// the latest value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LiveReadings
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut readings = Self::new();
        for (name, value) in iter {
            readings.insert(name, value);
        }
        readings
    }
}

// Deserialized by hand so document order survives; a JSON object decoded
// through serde_json's default map would come back sorted.
impl<'de> Deserialize<'de> for LiveReadings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ReadingsVisitor;

        impl<'de> Visitor<'de> for ReadingsVisitor {
            type Value = LiveReadings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut readings = LiveReadings::new();
                while let Some((name, value)) = map.next_entry::<String, AttributeValue>()? {
                    readings.insert(name, value);
                }
                Ok(readings)
            }
        }

        deserializer.deserialize_map(ReadingsVisitor)
    }
}

impl Serialize for LiveReadings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Merge live readings with saved attributes into one ordered list.
///
/// Live attributes come first in reporting order, taking value and type
/// from the device and option, rename and proc from the saved record of the
/// same name. Saved attributes not reported live follow, unchanged, in saved
/// order. Without live readings the saved list is returned as is.
pub fn merge_attributes(live: Option<&LiveReadings>, saved: &[Attribute]) -> Vec<Attribute> {
    let Some(live) = live else {
        return saved.to_vec();
    };

    let mut merged: Vec<Attribute> = live
        .iter()
        .map(|(name, value)| {
            let observed = Attribute::observed(name, value.clone());
            match saved.iter().find(|a| a.name == name) {
                Some(prior) => Attribute {
                    option: prior.option,
                    rename: prior.rename.clone(),
                    proc: prior.proc.clone(),
                    ..observed
                },
                None => observed,
            }
        })
        .collect();

    let live_names: HashSet<&str> = live.iter().map(|(name, _)| name).collect();
    merged.extend(
        saved
            .iter()
            .filter(|a| !live_names.contains(a.name.as_str()))
            .cloned(),
    );
    merged
}

/// Build the initial draft for a session.
///
/// The name and persisted id come from the saved configuration when one
/// exists; otherwise the device id doubles as the name.
pub fn build_draft(
    device_id: &str,
    device_type: &str,
    live: Option<&LiveReadings>,
    saved: Option<&ConfigDraft>,
) -> ConfigDraft {
    let saved_attributes = saved.map(|s| s.attributes()).unwrap_or_default();
    ConfigDraft {
        device_id: device_id.to_string(),
        name: saved
            .map(|s| s.name.clone())
            .unwrap_or_else(|| device_id.to_string()),
        device_type: device_type.to_string(),
        config: AttributeConfig {
            attributes: merge_attributes(live, saved_attributes),
        },
        id: saved.and_then(|s| s.id.clone()),
    }
}
