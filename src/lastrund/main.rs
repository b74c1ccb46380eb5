// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

pub mod config;
mod controller;
mod response;

use config::Config;
use controller::ContextBuilder;
use lastrunlib::{
    catalog::Catalog,
    itglue,
    notify::{Recipients, SendGrid},
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.log.init();
    tracing::debug!("config:\n{}", config);

    if config.itglue.api_key.is_empty() || config.itglue.asset_type_id.is_empty() {
        tracing::warn!("IT Glue api key or asset type id not set, fetching assets will fail");
    }
    let recipients = Recipients::parse(&config.notification.to);
    if recipients.is_empty() {
        tracing::warn!("No recipients configured, reports cannot be sent by email");
    }

    let catalog = Catalog::load(config.audit.catalog.as_deref())?;
    for issue in catalog.lint() {
        tracing::warn!(%issue, "Catalog entry will be skipped on every run");
    }
    let notifier = SendGrid::with_base_url(
        config.notification.sendgrid_url.clone(),
        config.notification.api_key.clone(),
        config.notification.from(),
    );
    let ctx = ContextBuilder::new()
        .source(itglue::Client::new(config.itglue.settings()))
        .notifier(notifier)
        .catalog(catalog)
        .timestamps(config.audit.timestamps()?)
        .link_base(config.itglue.base_url.clone())
        .recipients(recipients)
        .api_key(config.endpoints.key.clone())
        .build()?;
    controller::run(ctx, &config).await
}
