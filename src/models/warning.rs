// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use serde::{Deserialize, Serialize};

/// The kind of audit that produced a warning.
///
/// Only used for presentation, it decides how the test value is labeled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    #[default]
    Inactivity,
    Version,
}

impl WarningKind {
    /// Label of the expected value in human readable reports.
    pub fn test_value_label(&self) -> &'static str {
        match self {
            WarningKind::Inactivity => "Threshold in Days",
            WarningKind::Version => "Expected Version",
        }
    }
}

/// A policy violation found on an asset.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub org_id: i64,
    pub org_name: String,
    pub error: String,
    pub error_details: String,
    /// The threshold or the expected version.
    pub test_value: String,
    /// The observed day difference or version.
    pub current_value: String,
    pub link: String,
    pub possible_servers: String,
    #[serde(skip)]
    pub kind: WarningKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_without_kind() {
        let warning = Warning {
            org_id: 1,
            org_name: "Contoso".to_string(),
            error: "e".to_string(),
            error_details: "d".to_string(),
            test_value: "20".to_string(),
            current_value: "31".to_string(),
            link: "l".to_string(),
            possible_servers: "SRV01".to_string(),
            kind: WarningKind::Version,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orgId": 1,
                "orgName": "Contoso",
                "error": "e",
                "errorDetails": "d",
                "testValue": "20",
                "currentValue": "31",
                "link": "l",
                "possibleServers": "SRV01"
            })
        );
    }
}
