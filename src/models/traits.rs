// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::Parsed;

/// Suffix of the trait that switches monitoring off for another trait.
pub const MONITORING_DISABLED_SUFFIX: &str = "-monitoring-disabled";

/// A single trait value as delivered by the documentation platform.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum TraitValue {
    Text(String),
    Bool(bool),
    /// `null`, or a shape that is never evaluated like a list of tags.
    #[default]
    Missing,
}

impl From<serde_json::Value> for TraitValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::String(x) => TraitValue::Text(x),
            Value::Bool(x) => TraitValue::Bool(x),
            Value::Number(x) => TraitValue::Text(x.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => TraitValue::Missing,
        }
    }
}

impl From<&str> for TraitValue {
    fn from(value: &str) -> Self {
        TraitValue::Text(value.to_string())
    }
}

impl From<String> for TraitValue {
    fn from(value: String) -> Self {
        TraitValue::Text(value)
    }
}

impl From<bool> for TraitValue {
    fn from(value: bool) -> Self {
        TraitValue::Bool(value)
    }
}

impl<'de> Deserialize<'de> for TraitValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(TraitValue::from)
    }
}

impl Serialize for TraitValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TraitValue::Text(x) => serializer.serialize_str(x),
            TraitValue::Bool(x) => serializer.serialize_bool(*x),
            TraitValue::Missing => serializer.serialize_none(),
        }
    }
}

/// The trait bag of an asset.
///
/// Keys come and go per organization, so nothing in here is an error when missing.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traits(HashMap<String, TraitValue>);

impl Traits {
    /// True when the key exists with a value other than [TraitValue::Missing].
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&TraitValue> {
        self.0
            .get(key)
            .filter(|x| !matches!(x, TraitValue::Missing))
    }

    /// Returns the text of a trait.
    ///
    /// A boolean where text is expected is malformed.
    pub fn text(&self, key: &str) -> Parsed<&str> {
        match self.get(key) {
            None => Parsed::Absent,
            Some(TraitValue::Text(x)) => Parsed::Valid(x.as_str()),
            Some(TraitValue::Bool(x)) => Parsed::Malformed(x.to_string()),
            Some(TraitValue::Missing) => Parsed::Absent,
        }
    }

    /// True when `{key}-monitoring-disabled` is the boolean `true`.
    pub fn monitoring_disabled(&self, key: &str) -> bool {
        let flag = format!("{key}{MONITORING_DISABLED_SUFFIX}");
        matches!(self.get(&flag), Some(TraitValue::Bool(true)))
    }
}

impl<K, V> FromIterator<(K, V)> for Traits
where
    K: Into<String>,
    V: Into<TraitValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Traits(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits() -> Traits {
        serde_json::from_str(
            r#"{
                "autodoc-version": "3.1.0",
                "autodoc-version-monitoring-disabled": true,
                "user-audit-last-ran": "2024-05-01",
                "user-audit-last-ran-monitoring-disabled": "true",
                "empty": null,
                "devices": [{"name": "SRV01"}],
                "count": 7,
                "flag": false
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn presence() {
        let traits = traits();
        assert!(traits.contains("autodoc-version"));
        assert!(!traits.contains("empty"));
        assert!(!traits.contains("devices"));
        assert!(!traits.contains("unknown"));
    }

    #[test]
    fn typed_text() {
        let traits = traits();
        assert_eq!(traits.text("autodoc-version"), Parsed::Valid("3.1.0"));
        assert_eq!(traits.text("count"), Parsed::Valid("7"));
        assert_eq!(traits.text("flag"), Parsed::Malformed("false".to_string()));
        assert_eq!(traits.text("empty"), Parsed::Absent);
    }

    #[test]
    fn only_boolean_true_disables_monitoring() {
        let traits = traits();
        assert!(traits.monitoring_disabled("autodoc-version"));
        assert!(!traits.monitoring_disabled("user-audit-last-ran"));
        assert!(!traits.monitoring_disabled("unknown"));
    }

    #[test]
    fn serializes_back_to_scalars() {
        let traits: Traits = [("a", TraitValue::from("x")), ("b", TraitValue::from(true))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&traits).unwrap();
        assert_eq!(json, serde_json::json!({"a": "x", "b": true}));
    }
}
