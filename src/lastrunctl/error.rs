// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{fmt, path::PathBuf};

use lastrunlib::{catalog, report};

#[derive(Debug, thiserror::Error)]
pub enum CliErrorKind {
    #[error("{0}")]
    Catalog(#[from] catalog::Error),
    #[error("{0}")]
    Report(#[from] report::Error),
    #[error("Invalid listing: {0}")]
    InvalidListing(#[from] serde_json::Error),
    #[error("Unknown time zone: {0}")]
    TimeZone(String),
    #[error("Invalid reference time '{0}', expected e.g. 2024-05-01T08:00:00")]
    InvalidReference(String),
    #[error("The catalog contains {0} issues")]
    Lint(usize),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub struct CliError {
    pub filename: Option<PathBuf>,
    pub kind: CliErrorKind,
}

impl CliError {
    pub fn with_file(kind: impl Into<CliErrorKind>, filename: Option<&PathBuf>) -> Self {
        CliError {
            filename: filename.cloned(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(filename) = &self.filename {
            write!(f, " filename: {:?}", filename)?;
        }
        Ok(())
    }
}

impl From<CliErrorKind> for CliError {
    fn from(kind: CliErrorKind) -> Self {
        CliError {
            kind,
            filename: None,
        }
    }
}

macro_rules! from_kind {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CliError {
                fn from(value: $t) -> Self {
                    CliErrorKind::from(value).into()
                }
            }
        )*
    };
}

from_kind!(
    catalog::Error,
    report::Error,
    serde_json::Error,
    std::io::Error
);
