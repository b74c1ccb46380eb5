// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Fetches the "Scripts - Last Run" assets from IT Glue.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AssetRecord, Listing};

const CONTENT_TYPE: &str = "application/vnd.api+json";
const PAGE_SIZE: u32 = 200;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to reach IT Glue: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("IT Glue responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Unable to parse the asset listing: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of the assets to evaluate.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches the assets of a run. Failing here fails the whole run.
    async fn fetch(&self) -> Result<Vec<AssetRecord>, Error>;
}

/// Connection settings of the flexible asset listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base of the API, e.g. `https://api.itglue.com/`.
    pub api_url: String,
    pub api_key: String,
    /// Id of the flexible asset type that contains the last runs.
    pub asset_type_id: String,
}

pub struct Client {
    settings: Settings,
    http: reqwest::Client,
}

impl Client {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/flexible_assets?filter[flexible_asset_type_id]={}&page[size]={PAGE_SIZE}",
            self.settings.api_url.trim_end_matches('/'),
            urlencoding::encode(self.settings.asset_type_id.trim()),
        )
    }
}

#[async_trait]
impl AssetSource for Client {
    async fn fetch(&self) -> Result<Vec<AssetRecord>, Error> {
        let url = self.url();
        tracing::debug!(url = %url, "fetching assets");
        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.settings.api_key)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, CONTENT_TYPE)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Status { status, body });
        }
        let listing: Listing = serde_json::from_str(&body)?;
        let assets = listing.into_assets();
        tracing::info!(assets = assets.len(), "fetched assets");
        Ok(assets)
    }
}
