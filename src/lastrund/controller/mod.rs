// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

mod context;
pub mod entry;

use std::{net::SocketAddr, sync::Arc};

pub use context::{Context, ContextBuilder};
use hyper::server::conn::http1::Builder;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::config;

pub async fn run(
    ctx: Context,
    config: &config::Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = config.listener.address;
    let incoming = TcpListener::bind(&addr).await?;
    let controller = Arc::new(ctx);
    tracing::info!(
        audits = controller.catalog.audits().len(),
        custom = controller.catalog.custom().count(),
        "catalog loaded"
    );

    tracing::info!("listening on http://{}", addr);
    loop {
        let (tcp_stream, remote_addr) = incoming.accept().await?;
        let ctx = controller.clone();
        tokio::spawn(async move {
            tracing::trace!(%remote_addr, "accepted connection");
            let service = entry::EntryPoint::new(ctx);
            if let Err(err) = Builder::new()
                .serve_connection(TokioIo::new(tcp_stream), service)
                .await
            {
                tracing::debug!("failed to serve connection: {err:#}");
            }
        });
    }
}
