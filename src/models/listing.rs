// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! JSON:API documents as returned by the flexible asset listing.

use serde::{Deserialize, Deserializer, Serialize};

use super::{AssetRecord, Traits};

/// One page of the flexible asset listing.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: Vec<ListingAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListingMeta>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingAsset {
    /// Usually a string, some exports write it as a number.
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: ListingAttributes,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListingAttributes {
    /// Usually a number, some exports write it as a string.
    #[serde(default)]
    pub organization_id: serde_json::Value,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_traits")]
    pub traits: Traits,
}

/// Anything but an object, e.g. `null`, is read as an empty trait bag.
fn lenient_traits<'de, D>(deserializer: D) -> Result<Traits, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(x) => Ok(x.into_iter().collect()),
        _ => Ok(Traits::default()),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListingMeta {
    pub current_page: Option<u64>,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
    pub total_pages: Option<u64>,
    pub total_count: Option<u64>,
}

impl ListingAsset {
    fn id(&self) -> Option<String> {
        match &self.id {
            serde_json::Value::String(x) => Some(x.clone()),
            serde_json::Value::Number(x) => Some(x.to_string()),
            _ => None,
        }
    }
}

impl ListingAttributes {
    fn organization_id(&self) -> Option<i64> {
        match &self.organization_id {
            serde_json::Value::Number(x) => x.as_i64(),
            serde_json::Value::String(x) => x.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Listing {
    /// Converts the listing into asset records.
    ///
    /// Entries without a usable organization are dropped.
    pub fn into_assets(self) -> Vec<AssetRecord> {
        if let Some(meta) = &self.meta {
            if meta.next_page.is_some() {
                tracing::debug!(
                    total_count = meta.total_count,
                    "listing has more pages, only the first one is evaluated"
                );
            }
        }
        self.data
            .into_iter()
            .filter_map(|asset| {
                let Some(id) = asset.id() else {
                    tracing::warn!(asset_id = %asset.id, "Asset without an id, skipping");
                    return None;
                };
                let organization_id = match asset.attributes.organization_id() {
                    Some(x) => x,
                    None => {
                        tracing::warn!(
                            asset_id = %asset.id,
                            organization_id = %asset.attributes.organization_id,
                            "Asset without a usable organization id, skipping"
                        );
                        return None;
                    }
                };
                Some(AssetRecord {
                    id,
                    organization_id,
                    organization_name: asset.attributes.organization_name.unwrap_or_default(),
                    traits: asset.attributes.traits,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Listing;

    #[test]
    #[tracing_test::traced_test]
    fn converts_records() {
        let listing: Listing = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "id": "1",
                        "type": "flexible-assets",
                        "attributes": {
                            "organization-id": 10,
                            "organization-name": "Contoso",
                            "traits": {"autodoc-version": "3.2"}
                        }
                    },
                    {
                        "id": "2",
                        "type": "flexible-assets",
                        "attributes": {
                            "organization-id": "11",
                            "organization-name": "Fabrikam",
                            "traits": {}
                        }
                    },
                    {
                        "id": "3",
                        "type": "flexible-assets",
                        "attributes": {"organization-name": "Nobody"}
                    }
                ],
                "meta": {"current-page": 1, "next-page": 2, "total-count": 201}
            }"#,
        )
        .unwrap();
        let assets = listing.into_assets();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].organization_id, 10);
        assert_eq!(assets[0].organization_name, "Contoso");
        assert!(assets[0].traits.contains("autodoc-version"));
        assert_eq!(assets[1].organization_id, 11);
        assert!(logs_contain("Asset without a usable organization id"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn tolerates_numeric_ids_and_missing_traits() {
        let listing: Listing = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "id": 1,
                        "attributes": {"organization-id": 10, "traits": null}
                    },
                    {
                        "id": null,
                        "attributes": {"organization-id": 10, "traits": {}}
                    },
                    {
                        "id": "3",
                        "attributes": {"organization-id": 10, "traits": "n/a"}
                    }
                ]
            }"#,
        )
        .unwrap();
        let assets = listing.into_assets();
        let ids: Vec<_> = assets.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(!assets[0].traits.contains("autodoc-version"));
        assert!(logs_contain("Asset without an id"));
    }
}
