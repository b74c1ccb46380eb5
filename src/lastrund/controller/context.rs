// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::sync::Arc;

use lastrunlib::{
    catalog::Catalog,
    itglue::AssetSource,
    notify::{Notifier, Recipients},
    parse::TimestampParser,
};

/// Shared state of all connections.
pub struct Context {
    pub source: Arc<dyn AssetSource>,
    pub notifier: Arc<dyn Notifier>,
    pub catalog: Arc<Catalog>,
    pub timestamps: TimestampParser,
    pub link_base: String,
    pub recipients: Recipients,
    /// When set requests to `/audit` must contain it as `x-api-key`.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NoSource;
#[derive(Debug, Clone)]
pub struct NoNotifier;

/// Context builder is used to build the context of the application.
pub struct ContextBuilder<S, N> {
    source: S,
    notifier: N,
    catalog: Option<Arc<Catalog>>,
    timestamps: TimestampParser,
    link_base: String,
    recipients: Recipients,
    api_key: Option<String>,
}

impl ContextBuilder<NoSource, NoNotifier> {
    /// Creates a new context builder.
    pub fn new() -> Self {
        Self {
            source: NoSource,
            notifier: NoNotifier,
            catalog: None,
            timestamps: TimestampParser::default(),
            link_base: String::new(),
            recipients: Recipients::default(),
            api_key: None,
        }
    }
}

impl Default for ContextBuilder<NoSource, NoNotifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> ContextBuilder<S, N> {
    /// Sets the catalog. Without one the built-in catalog is used.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn timestamps(mut self, timestamps: TimestampParser) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Sets the base of the links to the assets.
    pub fn link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    pub fn recipients(mut self, recipients: Recipients) -> Self {
        self.recipients = recipients;
        self
    }

    /// Sets the api key.
    pub fn api_key(mut self, api_key: impl Into<Option<String>>) -> Self {
        self.api_key = api_key.into().filter(|x| !x.is_empty());
        self
    }
}

impl<N> ContextBuilder<NoSource, N> {
    /// Sets the asset source. This is required.
    pub fn source<S>(self, source: S) -> ContextBuilder<Arc<dyn AssetSource>, N>
    where
        S: AssetSource + 'static,
    {
        let ContextBuilder {
            source: _,
            notifier,
            catalog,
            timestamps,
            link_base,
            recipients,
            api_key,
        } = self;
        ContextBuilder {
            source: Arc::new(source),
            notifier,
            catalog,
            timestamps,
            link_base,
            recipients,
            api_key,
        }
    }
}

impl<S> ContextBuilder<S, NoNotifier> {
    /// Sets the notifier. This is required.
    pub fn notifier<N>(self, notifier: N) -> ContextBuilder<S, Arc<dyn Notifier>>
    where
        N: Notifier + 'static,
    {
        let ContextBuilder {
            source,
            notifier: _,
            catalog,
            timestamps,
            link_base,
            recipients,
            api_key,
        } = self;
        ContextBuilder {
            source,
            notifier: Arc::new(notifier),
            catalog,
            timestamps,
            link_base,
            recipients,
            api_key,
        }
    }
}

impl ContextBuilder<Arc<dyn AssetSource>, Arc<dyn Notifier>> {
    pub fn build(self) -> Result<Context, lastrunlib::catalog::Error> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(Catalog::builtin()?),
        };
        Ok(Context {
            source: self.source,
            notifier: self.notifier,
            catalog,
            timestamps: self.timestamps,
            link_base: self.link_base,
            recipients: self.recipients,
            api_key: self.api_key,
        })
    }
}
