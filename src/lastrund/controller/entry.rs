// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Defines the entry point for the controller.
//!
//! All known paths must be handled in the entrypoint function.

use std::{convert::Infallible, fmt::Display, marker::PhantomData, sync::Arc};

use hyper::{Method, Request, StatusCode};
use lastrunlib::{
    audit::{self, AuditContext},
    report,
};

use super::context::Context;
use crate::response::{BodyKind, BodyKindContent, internal_server_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HealthOpts {
    /// Ready
    Ready,
    /// Alive
    Alive,
}

/// The supported paths of lastrund
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KnownPaths {
    /// / or /audit
    Audit,
    /// /health
    Health(HealthOpts),
    /// Not supported
    Unknown,
}

impl KnownPaths {
    pub fn requires_key(&self) -> bool {
        matches!(self, Self::Audit)
    }

    /// Parses a path and returns the corresponding `KnownPaths` variant.
    fn from_path(path: &str) -> Self {
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        match (parts.next(), parts.next(), parts.next()) {
            (None, _, _) | (Some("audit"), None, _) => KnownPaths::Audit,
            (Some("health"), Some("ready"), None) => KnownPaths::Health(HealthOpts::Ready),
            (Some("health"), Some("alive"), None) => KnownPaths::Health(HealthOpts::Alive),
            _ => {
                tracing::trace!(?path, "Unknown");
                KnownPaths::Unknown
            }
        }
    }
}

impl Display for KnownPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnownPaths::Audit => write!(f, "/audit"),
            KnownPaths::Health(HealthOpts::Alive) => write!(f, "/health/alive"),
            KnownPaths::Health(HealthOpts::Ready) => write!(f, "/health/ready"),
            KnownPaths::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Representation of the audit result requested via `returnType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ReturnType {
    #[default]
    Json,
    Html,
    Email,
}

impl ReturnType {
    fn from_query(query: Option<&str>) -> Self {
        let value = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|x| x.split_once('='))
            .find(|(k, _)| *k == "returnType")
            .map(|(_, v)| urlencoding::decode(v).map(|x| x.into_owned()).unwrap_or_default());
        match value.as_deref() {
            Some("html") => ReturnType::Html,
            Some("email") => ReturnType::Email,
            _ => ReturnType::Json,
        }
    }
}

pub struct EntryPoint<R> {
    pub ctx: Arc<Context>,
    _phantom: PhantomData<R>,
}

impl<R> EntryPoint<R> {
    pub fn new(ctx: Arc<Context>) -> EntryPoint<R> {
        Self {
            ctx,
            _phantom: PhantomData,
        }
    }
}

async fn run_audit(ctx: &Context, return_type: ReturnType) -> BodyKind {
    let assets = match ctx.source.fetch().await {
        Ok(assets) => assets,
        Err(e) => {
            tracing::warn!(error = %e, "Unable to fetch assets");
            return BodyKind::no_content(StatusCode::BAD_GATEWAY);
        }
    };
    let context = AuditContext::new(ctx.timestamps, ctx.link_base.clone());
    let run = audit::run(&assets, &ctx.catalog, &context);
    match return_type {
        ReturnType::Json => match report::json(&run.warnings) {
            Ok(x) => BodyKind::json_content(StatusCode::OK, x),
            Err(e) => internal_server_error!(e),
        },
        ReturnType::Html => match report::page(&run.warnings) {
            Ok(x) => BodyKind::html_content(StatusCode::OK, x),
            Err(e) => internal_server_error!(e),
        },
        ReturnType::Email => match report::compose(&run.warnings) {
            Ok(Some(email)) => match ctx.notifier.send(&email, &ctx.recipients).await {
                Ok(()) => BodyKind::no_content(StatusCode::OK),
                Err(e) => {
                    tracing::warn!(error = %e, "Unable to send report");
                    BodyKind::no_content(StatusCode::BAD_GATEWAY)
                }
            },
            Ok(None) => {
                tracing::debug!("Nothing to report");
                BodyKind::no_content(StatusCode::OK)
            }
            Err(e) => internal_server_error!(e),
        },
    }
}

impl<R> hyper::service::Service<Request<R>> for EntryPoint<R>
where
    R: hyper::body::Body + Send + 'static,
    <R as hyper::body::Body>::Error: std::error::Error,
    <R as hyper::body::Body>::Data: Send,
{
    type Response = hyper::Response<BodyKindContent>;

    type Error = Infallible;

    type Future = std::pin::Pin<
        Box<dyn futures::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn call(&self, req: Request<R>) -> Self::Future {
        let ctx = self.ctx.clone();
        let method = req.method().clone();
        let kp = KnownPaths::from_path(req.uri().path());
        let return_type = ReturnType::from_query(req.uri().query());
        let authorized = match ctx.api_key.as_ref() {
            Some(key) => match req.headers().get("x-api-key") {
                Some(v) if v == key => true,
                Some(v) => {
                    tracing::debug!("{} {} invalid key: {:?}", method, kp, v);
                    false
                }
                None => false,
            },
            None => true,
        };
        Box::pin(async move {
            if kp.requires_key() && !authorized {
                tracing::debug!("{} {} unauthorized", method, kp);
                return Ok(BodyKind::no_content(StatusCode::UNAUTHORIZED).into_response());
            }
            // on head requests we just return an empty response
            if method == Method::HEAD && kp != KnownPaths::Unknown {
                return Ok(BodyKind::no_content(StatusCode::OK).into_response());
            }
            tracing::debug!(%method, path = %kp, ?return_type, "process call");
            let result = match (&method, kp) {
                (&Method::GET, KnownPaths::Audit) | (&Method::POST, KnownPaths::Audit) => {
                    run_audit(&ctx, return_type).await
                }
                (&Method::GET, KnownPaths::Health(_)) => BodyKind::no_content(StatusCode::OK),
                (_, KnownPaths::Unknown) => BodyKind::no_content(StatusCode::NOT_FOUND),
                _ => BodyKind::no_content(StatusCode::METHOD_NOT_ALLOWED),
            };
            Ok(result.into_response())
        })
    }
}
