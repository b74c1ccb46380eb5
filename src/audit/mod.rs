// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Evaluates assets against the catalog.
//!
//! Evaluation is synchronous and never fails as a whole. Anything that cannot be
//! interpreted is logged and results in a [Skip] of that one audit, an asset with an
//! invalid id is skipped entirely.

mod aggregate;
mod evaluate;
pub mod extract;

use chrono::NaiveDateTime;

pub use aggregate::{AuditRun, audit_asset, run};
pub use evaluate::Evaluator;

use crate::{models::Warning, parse::TimestampParser};

/// Reference time and presentation settings of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    reference: NaiveDateTime,
    timestamps: TimestampParser,
    link_base: String,
}

impl AuditContext {
    /// Pins the reference time to now in the zone of the parser.
    pub fn new<S: Into<String>>(timestamps: TimestampParser, link_base: S) -> Self {
        Self::at(timestamps.now(), timestamps, link_base)
    }

    pub fn at<S: Into<String>>(
        reference: NaiveDateTime,
        timestamps: TimestampParser,
        link_base: S,
    ) -> Self {
        Self {
            reference,
            timestamps,
            link_base: link_base.into(),
        }
    }

    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    pub fn timestamps(&self) -> &TimestampParser {
        &self.timestamps
    }

    pub fn link_base(&self) -> &str {
        &self.link_base
    }
}

/// Why an audit was not evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// `{key}-monitoring-disabled` is set.
    MonitoringDisabled,
    /// The asset does not have the trait.
    TraitAbsent,
    /// The trait value cannot be interpreted.
    MalformedTrait(String),
    /// The catalog value cannot be interpreted.
    MalformedDefinition(String),
    /// No timestamp of the script was found in the custom scripts text.
    ScriptNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Fired(Warning),
    Passed,
    Skipped(Skip),
}
