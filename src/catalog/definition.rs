// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::parse::{self, DottedVersion, Parsed};

use super::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Trait listing the hosts a script runs on, copied into each warning.
    pub possible_servers_trait: String,
    /// Free text trait containing the `name: date` fragments of custom scripts.
    pub custom_scripts_trait: String,
    /// Text that marks an audit as freshness source when not configured explicitly.
    pub freshness_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            possible_servers_trait: "devices-running-autodoc".to_string(),
            custom_scripts_trait: "custom-scripts".to_string(),
            freshness_marker: "[User Audit]".to_string(),
        }
    }
}

/// Display text of a warning.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    pub error: String,
    pub error_details: String,
}

impl Message {
    fn contains(&self, marker: &str) -> bool {
        !marker.is_empty() && (self.error.contains(marker) || self.error_details.contains(marker))
    }
}

/// Allowed days of inactivity as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threshold(String);

impl Threshold {
    pub fn days(&self) -> Parsed<i64> {
        parse::days(&self.0)
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Threshold {
    fn from(value: &str) -> Self {
        Threshold(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionAudit {
    latest_version: String,
    version_updated_on: String,
}

impl VersionAudit {
    pub fn new<S: Into<String>>(latest_version: S, version_updated_on: S) -> Self {
        Self {
            latest_version: latest_version.into(),
            version_updated_on: version_updated_on.into(),
        }
    }

    /// The expected version. Unlike observed values it is not stripped.
    pub fn latest(&self) -> Parsed<DottedVersion> {
        match self.latest_version.parse() {
            Ok(x) => Parsed::Valid(x),
            Err(_) => Parsed::Malformed(self.latest_version.clone()),
        }
    }

    /// When the expected version was last changed in the catalog.
    pub fn updated_on(&self) -> Parsed<NaiveDateTime> {
        match parse::catalog_date(&self.version_updated_on) {
            Parsed::Absent => Parsed::Malformed(self.version_updated_on.clone()),
            x => x,
        }
    }
}

impl Display for VersionAudit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} since {}",
            self.latest_version, self.version_updated_on
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InactivityAudit {
    pub threshold: Threshold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditKind {
    Version(VersionAudit),
    Inactivity(InactivityAudit),
}

/// A check of a single trait that every asset is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audit {
    /// Name of the trait.
    pub key: String,
    pub kind: AuditKind,
    pub message: Message,
    freshness_source: Option<bool>,
}

impl Audit {
    /// True when the trait of this audit tells when the user audit ran last.
    ///
    /// Without an explicit setting the marker text in the message decides.
    pub fn is_freshness_source(&self, marker: &str) -> bool {
        self.freshness_source
            .unwrap_or_else(|| self.message.contains(marker))
    }
}

/// An inactivity check that only applies to a single organization.
///
/// The timestamp is taken out of the custom scripts text instead of a dedicated trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAudit {
    pub organization_id: i64,
    /// Name of the script as written in front of the colon.
    pub name: String,
    pub inactivity: InactivityAudit,
    pub message: Message,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum RawThreshold {
    Number(i64),
    Text(String),
    Other(toml::Value),
}

impl From<RawThreshold> for Threshold {
    fn from(value: RawThreshold) -> Self {
        match value {
            RawThreshold::Number(x) => Threshold(x.to_string()),
            RawThreshold::Text(x) => Threshold(x),
            RawThreshold::Other(x) => Threshold(x.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(super) struct RawAudit {
    key: String,
    inactive_days: Option<RawThreshold>,
    latest_version: Option<String>,
    version_updated_on: Option<String>,
    error: String,
    #[serde(default)]
    error_details: String,
    freshness_source: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(super) struct RawCustom {
    organization_id: i64,
    name: String,
    inactive_days: RawThreshold,
    error: String,
    #[serde(default)]
    error_details: String,
}

impl TryFrom<RawAudit> for Audit {
    type Error = Error;

    fn try_from(raw: RawAudit) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| Error::InvalidDefinition {
            key: raw.key.clone(),
            reason: reason.to_string(),
        };
        if raw.key.trim().is_empty() {
            return Err(invalid("the key must not be empty"));
        }
        let kind = match (
            raw.inactive_days.clone(),
            raw.latest_version.clone(),
            raw.version_updated_on.clone(),
        ) {
            (Some(days), None, None) => AuditKind::Inactivity(InactivityAudit {
                threshold: days.into(),
            }),
            (None, Some(latest), Some(updated_on)) => {
                AuditKind::Version(VersionAudit::new(latest, updated_on))
            }
            (Some(_), _, _) => {
                return Err(invalid(
                    "inactive-days cannot be combined with latest-version or version-updated-on",
                ));
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(invalid(
                    "latest-version and version-updated-on must be given together",
                ));
            }
            (None, None, None) => {
                return Err(invalid(
                    "either inactive-days or latest-version and version-updated-on are required",
                ));
            }
        };
        Ok(Audit {
            key: raw.key,
            kind,
            message: Message {
                error: raw.error,
                error_details: raw.error_details,
            },
            freshness_source: raw.freshness_source,
        })
    }
}

impl TryFrom<RawCustom> for CustomAudit {
    type Error = Error;

    fn try_from(raw: RawCustom) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(Error::InvalidDefinition {
                key: format!("custom audit of organization {}", raw.organization_id),
                reason: "the name must not be empty".to_string(),
            });
        }
        Ok(CustomAudit {
            organization_id: raw.organization_id,
            name: raw.name,
            inactivity: InactivityAudit {
                threshold: raw.inactive_days.into(),
            },
            message: Message {
                error: raw.error,
                error_details: raw.error_details,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit(toml: &str) -> Result<Audit, Error> {
        let raw: RawAudit = toml::from_str(toml).unwrap();
        Audit::try_from(raw)
    }

    #[test]
    fn inactivity_threshold_as_number_or_text() {
        let a = audit("key = \"a\"\ninactive-days = 14\nerror = \"e\"").unwrap();
        let b = audit("key = \"b\"\ninactive-days = \"14\"\nerror = \"e\"").unwrap();
        for x in [a, b] {
            match x.kind {
                AuditKind::Inactivity(x) => assert_eq!(x.threshold.days(), Parsed::Valid(14)),
                _ => panic!("expected an inactivity audit"),
            }
        }
    }

    #[test]
    fn exactly_one_kind() {
        assert!(matches!(
            audit("key = \"a\"\ninactive-days = 1\nlatest-version = \"1.0\"\nversion-updated-on = \"01/01/2024\"\nerror = \"e\""),
            Err(Error::InvalidDefinition { .. })
        ));
        assert!(matches!(
            audit("key = \"a\"\nlatest-version = \"1.0\"\nerror = \"e\""),
            Err(Error::InvalidDefinition { .. })
        ));
        assert!(matches!(
            audit("key = \"a\"\nerror = \"e\""),
            Err(Error::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn version_values() {
        let audit = VersionAudit::new("3.2", "01/01/2024");
        assert_eq!(audit.latest(), Parsed::Valid("3.2".parse().unwrap()));
        assert!(audit.updated_on().is_valid());
        let audit = VersionAudit::new("v3", "");
        assert_eq!(audit.latest(), Parsed::Malformed("v3".to_string()));
        assert_eq!(audit.updated_on(), Parsed::Malformed(String::new()));
    }

    #[test]
    fn freshness_source_defaults_to_the_marker() {
        let marked = audit("key = \"a\"\ninactive-days = 1\nerror = \"[User Audit] stale\"").unwrap();
        let opted_out = audit(
            "key = \"b\"\ninactive-days = 1\nerror = \"[User Audit] stale\"\nfreshness-source = false",
        )
        .unwrap();
        let opted_in =
            audit("key = \"c\"\ninactive-days = 1\nerror = \"stale\"\nfreshness-source = true").unwrap();
        assert!(marked.is_freshness_source("[User Audit]"));
        assert!(!opted_out.is_freshness_source("[User Audit]"));
        assert!(opted_in.is_freshness_source("[User Audit]"));
        assert!(!marked.is_freshness_source(""));
    }
}
