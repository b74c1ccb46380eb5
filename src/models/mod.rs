// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

mod asset;
mod listing;
mod traits;
mod warning;

pub use asset::*;
pub use listing::*;
pub use traits::*;
pub use warning::*;

#[cfg(test)]
mod tests {
    use super::Listing;

    #[test]
    fn parse_minimal() {
        let json_str = r#"{
    "data": [
        {
            "id": "4711",
            "type": "flexible-assets",
            "attributes": {
                "organization-id": 1,
                "organization-name": "Contoso",
                "traits": {
                    "autodoc-version": "3.2",
                    "autodoc-version-monitoring-disabled": false,
                    "devices-running-autodoc": "SRV01, SRV02"
                }
            }
        }
    ]
}
"#;
        // tests that it doesn't panic when parsing the json
        let listing: Listing = serde_json::from_str(json_str).unwrap();
        let assets = listing.into_assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].numeric_id(), Ok(4711));
    }
}
