// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Finds the last run of a script in the custom scripts text.
//!
//! The text is maintained by hand in a rich text field and looks like
//! `<div>BackupScript: 01/05/2024</div><div>CleanupScript:<br>02/05/2024</div>`.

use chrono::NaiveDateTime;
use lazy_regex::{Lazy, lazy_regex};
use regex::Regex;

use crate::parse::{Parsed, TimestampParser, is_zero_timestamp};

static LINE_NOISE: Lazy<Regex> = lazy_regex!(r"(\s|<br>|<br\s?/>|\\n)+");

/// Result of looking up a script name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Most recent timestamp of all fragments of the script.
    pub latest: Option<NaiveDateTime>,
    /// Fragment values that are not timestamps.
    pub rejected: Vec<String>,
}

fn fragment(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"{}:\s?(?:\s|<br\s?/?>)*(.+?)(?:</div>|<br\s?/?>|\\n|\n|$)",
        regex::escape(name)
    ))
}

/// Looks up every `name: timestamp` fragment and returns the latest timestamp.
///
/// `0001-01-01T00:00:00` is ignored.
pub fn latest_run(text: &str, name: &str, timestamps: &TimestampParser) -> Extraction {
    let mut result = Extraction::default();
    if name.is_empty() || !text.contains(name) {
        return result;
    }
    let re = match fragment(name) {
        Ok(x) => x,
        Err(e) => {
            tracing::warn!(error = %e, name, "Unable to build script pattern");
            return result;
        }
    };
    for captures in re.captures_iter(text) {
        let Some(value) = captures.get(1) else {
            continue;
        };
        let cleaned = LINE_NOISE.replace_all(value.as_str(), "");
        match timestamps.parse(&cleaned) {
            Parsed::Valid(x) if is_zero_timestamp(x) => {}
            Parsed::Valid(x) => {
                result.latest = Some(result.latest.map_or(x, |latest| latest.max(x)));
            }
            Parsed::Absent | Parsed::Malformed(_) => {
                result.rejected.push(value.as_str().to_string());
            }
        }
    }
    result
}
