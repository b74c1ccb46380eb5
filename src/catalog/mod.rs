// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! The checks assets are evaluated against.
//!
//! A catalog is loaded once, from the built-in definition or a TOML file, and is
//! immutable afterwards.

mod definition;
mod error;

use std::{collections::BTreeMap, fmt::Display, path::Path};

use serde::Deserialize;

pub use definition::{
    Audit, AuditKind, CustomAudit, InactivityAudit, Message, Settings, Threshold, VersionAudit,
};
pub use error::Error;

use crate::parse::Parsed;
use definition::{RawAudit, RawCustom};

const BUILTIN: &str = include_str!("default.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default)]
    settings: Settings,
    #[serde(default, rename = "audit")]
    audits: Vec<RawAudit>,
    #[serde(default)]
    custom: Vec<RawCustom>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    settings: Settings,
    audits: Vec<Audit>,
    custom: BTreeMap<i64, Vec<CustomAudit>>,
    freshness: Vec<String>,
}

/// A value in the catalog that will be skipped at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub organization_id: Option<i64>,
    pub key: String,
    pub reason: String,
}

impl Display for LintIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.organization_id {
            Some(org) => write!(f, "{} (org: {}): {}", self.key, org, self.reason),
            None => write!(f, "{}: {}", self.key, self.reason),
        }
    }
}

impl Catalog {
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let raw: RawCatalog = toml::from_str(content)?;
        let mut audits: Vec<Audit> = Vec::with_capacity(raw.audits.len());
        for audit in raw.audits {
            let audit = Audit::try_from(audit)?;
            if audits.iter().any(|x| x.key == audit.key) {
                return Err(Error::Duplicate(audit.key));
            }
            audits.push(audit);
        }

        let mut custom: BTreeMap<i64, Vec<CustomAudit>> = BTreeMap::new();
        for audit in raw.custom {
            let audit = CustomAudit::try_from(audit)?;
            let org = custom.entry(audit.organization_id).or_default();
            if org.iter().any(|x| x.name == audit.name) {
                return Err(Error::Duplicate(format!(
                    "{} (org: {})",
                    audit.name, audit.organization_id
                )));
            }
            org.push(audit);
        }

        let freshness = audits
            .iter()
            .filter(|x| x.is_freshness_source(&raw.settings.freshness_marker))
            .map(|x| x.key.clone())
            .collect();

        Ok(Catalog {
            settings: raw.settings,
            audits,
            custom,
            freshness,
        })
    }

    pub fn from_file<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading catalog");
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_toml(BUILTIN)
    }

    /// Loads the given file or falls back to the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Audits in definition order.
    pub fn audits(&self) -> &[Audit] {
        &self.audits
    }

    /// Custom audits of an organization in definition order.
    pub fn custom_for(&self, organization_id: i64) -> &[CustomAudit] {
        self.custom
            .get(&organization_id)
            .map(|x| x.as_slice())
            .unwrap_or_default()
    }

    pub fn custom(&self) -> impl Iterator<Item = &CustomAudit> {
        self.custom.values().flatten()
    }

    /// Trait keys that contain the last run of the user audit.
    pub fn freshness_sources(&self) -> &[String] {
        &self.freshness
    }

    /// Finds values that cannot be interpreted.
    pub fn lint(&self) -> Vec<LintIssue> {
        fn malformed<T>(parsed: Parsed<T>, what: &str) -> Option<String> {
            match parsed {
                Parsed::Valid(_) => None,
                Parsed::Absent => Some(format!("{what} is missing")),
                Parsed::Malformed(x) => Some(format!("{what} '{x}' cannot be parsed")),
            }
        }

        let mut issues = Vec::new();
        for audit in &self.audits {
            let reasons = match &audit.kind {
                AuditKind::Inactivity(x) => vec![malformed(x.threshold.days(), "inactive-days")],
                AuditKind::Version(x) => vec![
                    malformed(x.latest(), "latest-version"),
                    malformed(x.updated_on(), "version-updated-on"),
                ],
            };
            issues.extend(reasons.into_iter().flatten().map(|reason| LintIssue {
                organization_id: None,
                key: audit.key.clone(),
                reason,
            }));
        }
        for audit in self.custom() {
            if let Some(reason) = malformed(audit.inactivity.threshold.days(), "inactive-days") {
                issues.push(LintIssue {
                    organization_id: Some(audit.organization_id),
                    key: audit.name.clone(),
                    reason,
                });
            }
        }
        issues
    }
}
