// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Traits;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Unable to parse asset id: '{0}'")]
    InvalidId(String),
}

/// One monitored entity as fetched from the documentation platform.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetRecord {
    /// Opaque identifier; numeric in practice.
    pub id: String,
    pub organization_id: i64,
    pub organization_name: String,
    #[serde(default)]
    pub traits: Traits,
}

impl AssetRecord {
    /// Verifies that the id is an integer.
    ///
    /// Assets that fail this are not evaluated at all.
    pub fn numeric_id(&self) -> Result<i32, AssetError> {
        self.id
            .trim()
            .parse()
            .map_err(|_| AssetError::InvalidId(self.id.clone()))
    }

    /// Deep link to the asset in the web interface of the platform.
    pub fn link(&self, base: &str) -> String {
        format!(
            "{}/{}/assets/records/{}",
            base.trim_end_matches('/'),
            self.organization_id,
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            organization_id: 42,
            organization_name: "Contoso".to_string(),
            traits: Traits::default(),
        }
    }

    #[test]
    fn numeric_id() {
        assert_eq!(asset("1234").numeric_id(), Ok(1234));
        assert_eq!(asset(" 7 ").numeric_id(), Ok(7));
        assert_eq!(
            asset("abc123").numeric_id(),
            Err(AssetError::InvalidId("abc123".to_string()))
        );
        assert_eq!(
            AssetError::InvalidId("abc123".to_string()).to_string(),
            "Unable to parse asset id: 'abc123'"
        );
    }

    #[test]
    fn link_has_a_single_separator() {
        let expected = "https://docs.example.com/42/assets/records/1234";
        assert_eq!(asset("1234").link("https://docs.example.com"), expected);
        assert_eq!(asset("1234").link("https://docs.example.com/"), expected);
    }
}
