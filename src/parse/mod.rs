// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Best-effort interpretation of the loosely typed values found in asset traits
//! and in the check catalog.
//!
//! Nothing in here fails hard. Every parser returns a [Parsed] so that callers can
//! tell a value that was never there apart from one that is there but unusable.

mod timestamp;
mod version;

pub use timestamp::{DateOrder, TimestampParser, catalog_date, day_difference, is_zero_timestamp};
pub use version::{DottedVersion, VersionError};

/// Outcome of interpreting a value that may be missing or garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    /// There is nothing to interpret.
    Absent,
    /// A value exists but cannot be interpreted; contains the offending input.
    Malformed(String),
    /// A usable value.
    Valid(T),
}

impl<T> Parsed<T> {
    /// Returns the value when valid.
    pub fn valid(self) -> Option<T> {
        match self {
            Parsed::Valid(x) => Some(x),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Parsed::Valid(_))
    }
}

/// Parses a whole number of days as written in the catalog.
///
/// Negative numbers are rejected, a threshold is a count of days.
pub fn days(raw: &str) -> Parsed<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Parsed::Absent;
    }
    match trimmed.parse::<i32>() {
        Ok(x) if x >= 0 => Parsed::Valid(x as i64),
        _ => Parsed::Malformed(raw.to_string()),
    }
}
