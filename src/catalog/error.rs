// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::path::PathBuf;

use thiserror::Error;

/// Errors while loading a catalog.
///
/// Values that merely cannot be interpreted are not errors, they are reported by
/// [super::Catalog::lint] and skipped at evaluation time.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid definition of {key}: {reason}")]
    InvalidDefinition { key: String, reason: String },
    #[error("{0} is defined more than once")]
    Duplicate(String),
}
