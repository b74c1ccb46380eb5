// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use super::Parsed;

/// Errors when a string is not a dotted version.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("a version needs 2 to 4 components but {0} were given")]
    ComponentCount(usize),
    #[error("the component '{0}' is not a non-negative number")]
    Component(String),
}

/// A version of two to four numeric components, e.g. `3.2` or `10.0.17763.1`.
///
/// Versions are compared structurally. A component that is not given is not the same
/// as an explicit zero, so `1.2` and `1.2.0` are different versions. This holds for
/// catalog values and observed values alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DottedVersion {
    major: u32,
    minor: u32,
    build: Option<u32>,
    revision: Option<u32>,
}

impl DottedVersion {
    /// Extracts a version out of free text.
    ///
    /// Every character that is neither a digit nor a period is removed before parsing.
    /// This also discards meaningful separators, `1.2-3` becomes `1.23`.
    pub fn extract(raw: &str) -> Parsed<Self> {
        let candidate: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        match candidate.parse() {
            Ok(version) => Parsed::Valid(version),
            Err(_) => Parsed::Malformed(candidate),
        }
    }
}

impl FromStr for DottedVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(VersionError::ComponentCount(parts.len()));
        }
        let mut numbers = Vec::with_capacity(parts.len());
        for part in parts {
            match part.parse::<i32>() {
                Ok(x) if x >= 0 && !part.starts_with('+') => numbers.push(x as u32),
                _ => return Err(VersionError::Component(part.to_string())),
            }
        }
        Ok(DottedVersion {
            major: numbers[0],
            minor: numbers[1],
            build: numbers.get(2).copied(),
            revision: numbers.get(3).copied(),
        })
    }
}

impl Display for DottedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
        }
        if let Some(revision) = self.revision {
            write!(f, ".{revision}")?;
        }
        Ok(())
    }
}
