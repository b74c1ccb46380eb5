// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::Parsed;

/// Order of day and month in purely numeric dates like `01/05/2024`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "day-first" => Ok(DateOrder::DayFirst),
            "month-first" => Ok(DateOrder::MonthFirst),
            x => Err(format!(
                "unknown date order '{x}', expected day-first or month-first"
            )),
        }
    }
}

const ISO_DATE_TIMES: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const ISO_DATES: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const OFFSET_DATE_TIMES: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DAY_FIRST_DATES: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const MONTH_FIRST_DATES: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

const TEXT_DATES: &[&str] = &["%d %B %Y", "%B %d, %Y", "%B %d %Y", "%d-%b-%Y"];

// The variants without a separator exist because script fragments are stored with
// their whitespace removed.
const TIMES: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

/// Parses the timestamps found in traits and script fragments.
///
/// Timestamps are compared as naive local times of the configured zone. A value that
/// carries its own offset is converted into that zone first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParser {
    zone: Tz,
    order: DateOrder,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(Tz::UTC, DateOrder::default())
    }
}

impl TimestampParser {
    pub fn new(zone: Tz, order: DateOrder) -> Self {
        Self { zone, order }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    /// The current wall clock time of the configured zone.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.zone).naive_local()
    }

    fn numeric_dates(&self) -> &'static [&'static str] {
        match self.order {
            DateOrder::DayFirst => DAY_FIRST_DATES,
            DateOrder::MonthFirst => MONTH_FIRST_DATES,
        }
    }

    fn with_offset(&self, raw: &str) -> Option<NaiveDateTime> {
        let parsed = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
            OFFSET_DATE_TIMES
                .iter()
                .find_map(|f| DateTime::parse_from_str(raw, f).ok())
        })?;
        Some(parsed.with_timezone(&self.zone).naive_local())
    }

    fn date_time(raw: &str, dates: &[&str]) -> Option<NaiveDateTime> {
        for date in dates {
            for time in TIMES {
                for format in [format!("{date} {time}"), format!("{date}{time}")] {
                    if let Ok(x) = NaiveDateTime::parse_from_str(raw, &format) {
                        return Some(x);
                    }
                }
            }
        }
        None
    }

    fn date(raw: &str, dates: &[&str]) -> Option<NaiveDateTime> {
        dates
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
            .map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Tries the known timestamp shapes one after another.
    pub fn parse(&self, raw: &str) -> Parsed<NaiveDateTime> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Parsed::Malformed(raw.to_string());
        }
        if let Some(x) = self.with_offset(trimmed) {
            return Parsed::Valid(x);
        }
        if let Some(x) = ISO_DATE_TIMES
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(trimmed, f).ok())
        {
            return Parsed::Valid(x);
        }
        let found = Self::date(trimmed, ISO_DATES)
            .or_else(|| Self::date_time(trimmed, self.numeric_dates()))
            .or_else(|| Self::date(trimmed, self.numeric_dates()))
            .or_else(|| Self::date_time(trimmed, TEXT_DATES))
            .or_else(|| Self::date(trimmed, TEXT_DATES));
        match found {
            Some(x) => Parsed::Valid(x),
            None => Parsed::Malformed(raw.to_string()),
        }
    }
}

/// Parses a catalog date, which is always written as `dd/mm/yyyy`.
pub fn catalog_date(raw: &str) -> Parsed<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Parsed::Absent;
    }
    match NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        Ok(x) => Parsed::Valid(x.and_time(NaiveTime::MIN)),
        Err(_) => Parsed::Malformed(raw.to_string()),
    }
}

/// Whole days from `observed` to `reference`, truncated toward zero.
pub fn day_difference(reference: NaiveDateTime, observed: NaiveDateTime) -> i64 {
    (reference - observed).num_days()
}

/// True for `0001-01-01T00:00:00`, the value written by tools that never ran.
pub fn is_zero_timestamp(timestamp: NaiveDateTime) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1).map(|d| d.and_time(NaiveTime::MIN)) == Some(timestamp)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use chrono_tz::Tz;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn iso_shapes() {
        let parser = TimestampParser::default();
        assert_eq!(parser.parse("2024-05-01"), Parsed::Valid(at(2024, 5, 1, 0, 0)));
        assert_eq!(
            parser.parse("2024-05-01 13:45:10"),
            Parsed::Valid(
                NaiveDate::from_ymd_opt(2024, 5, 1)
                    .unwrap()
                    .and_hms_opt(13, 45, 10)
                    .unwrap()
            )
        );
        assert_eq!(
            parser.parse("2024-05-01T13:45"),
            Parsed::Valid(at(2024, 5, 1, 13, 45))
        );
    }

    #[test]
    fn offsets_are_moved_into_the_configured_zone() {
        let parser = TimestampParser::new(Tz::Australia__Brisbane, DateOrder::DayFirst);
        assert_eq!(
            parser.parse("2024-05-01T00:00:00Z"),
            Parsed::Valid(at(2024, 5, 1, 10, 0))
        );
        assert_eq!(
            parser.parse("2024-05-01T10:00:00+10:00"),
            Parsed::Valid(at(2024, 5, 1, 10, 0))
        );
        assert_eq!(
            parser.parse("2024-05-01T13:45:10.123+1000"),
            Parsed::Valid(
                NaiveDate::from_ymd_opt(2024, 5, 1)
                    .unwrap()
                    .and_hms_milli_opt(13, 45, 10, 123)
                    .unwrap()
            )
        );
        assert_eq!(
            parser.parse("2024-05-01T00:00:00+0000"),
            Parsed::Valid(at(2024, 5, 1, 10, 0))
        );
    }

    #[test]
    fn numeric_dates_follow_the_date_order() {
        let day_first = TimestampParser::default();
        let month_first = TimestampParser::new(Tz::UTC, DateOrder::MonthFirst);
        assert_eq!(day_first.parse("01/05/2024"), Parsed::Valid(at(2024, 5, 1, 0, 0)));
        assert_eq!(month_first.parse("01/05/2024"), Parsed::Valid(at(2024, 1, 5, 0, 0)));
        assert_eq!(day_first.parse("1/5/2024"), Parsed::Valid(at(2024, 5, 1, 0, 0)));
        assert!(!day_first.parse("13/13/2024").is_valid());
    }

    #[test]
    fn numeric_dates_with_times() {
        let parser = TimestampParser::default();
        assert_eq!(
            parser.parse("01/05/2024 10:30"),
            Parsed::Valid(at(2024, 5, 1, 10, 30))
        );
        assert_eq!(
            parser.parse("01/05/2024 10:30 PM"),
            Parsed::Valid(at(2024, 5, 1, 22, 30))
        );
        assert_eq!(
            parser.parse("01/05/202410:30PM"),
            Parsed::Valid(at(2024, 5, 1, 22, 30))
        );
    }

    #[test]
    fn textual_months() {
        let parser = TimestampParser::default();
        assert_eq!(parser.parse("1 May 2024"), Parsed::Valid(at(2024, 5, 1, 0, 0)));
        assert_eq!(parser.parse("May 1, 2024"), Parsed::Valid(at(2024, 5, 1, 0, 0)));
    }

    #[test]
    fn garbage_is_malformed() {
        let parser = TimestampParser::default();
        assert_eq!(parser.parse("never"), Parsed::Malformed("never".to_string()));
        assert_eq!(parser.parse("  "), Parsed::Malformed("  ".to_string()));
    }

    #[test]
    fn catalog_dates_are_day_first() {
        assert_eq!(catalog_date("01/02/2024"), Parsed::Valid(at(2024, 2, 1, 0, 0)));
        assert_eq!(catalog_date("2024-02-01"), Parsed::Malformed("2024-02-01".to_string()));
        assert_eq!(catalog_date(""), Parsed::Absent);
    }

    #[test]
    fn day_difference_truncates() {
        let reference = at(2024, 6, 1, 0, 0);
        assert_eq!(day_difference(reference, at(2024, 5, 1, 0, 0)), 31);
        assert_eq!(day_difference(reference, at(2024, 5, 31, 0, 1)), 0);
        assert_eq!(day_difference(reference, at(2024, 5, 30, 23, 0)), 1);
        assert_eq!(day_difference(reference, at(2024, 6, 3, 0, 0)), -2);
    }

    #[test]
    fn zero_timestamp() {
        assert!(is_zero_timestamp(at(1, 1, 1, 0, 0)));
        assert!(!is_zero_timestamp(at(1970, 1, 1, 0, 0)));
    }

    #[test]
    fn date_order_from_str() {
        assert_eq!("month-first".parse::<DateOrder>(), Ok(DateOrder::MonthFirst));
        assert!("whatever".parse::<DateOrder>().is_err());
    }
}
