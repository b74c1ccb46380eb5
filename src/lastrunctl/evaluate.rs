// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{path::PathBuf, str::FromStr};

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use lastrunlib::{
    audit::{self, AuditContext},
    catalog::Catalog,
    models::{AssetRecord, Listing},
    parse::{DateOrder, TimestampParser},
    report,
};

use crate::{CliError, CliErrorKind, utils::ArgOrStdin};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Html,
    Email,
}

#[derive(clap::Parser)]
pub struct EvaluateArgs {
    /// Saved asset listing as returned by IT Glue. Use "-" to read from stdin.
    #[clap(default_value = "-")]
    snapshot: ArgOrStdin<PathBuf>,
    /// Catalog file to use instead of the built-in one.
    #[clap(short, long)]
    catalog: Option<PathBuf>,
    /// Reference time of the run, e.g. 2024-05-01T08:00:00. Defaults to now.
    #[clap(long)]
    at: Option<String>,
    /// IANA time zone of the reference time and the trait values.
    #[clap(long, default_value = "UTC")]
    time_zone: String,
    /// Order of numeric dates.
    #[clap(long, default_value = "day-first", value_parser = DateOrder::from_str)]
    date_order: DateOrder,
    /// Base of the links to the assets.
    #[clap(long, default_value = "")]
    link_base: String,
    #[clap(short, long, value_enum, default_value_t)]
    format: Format,
    /// Print more details while running
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn reference(raw: &str) -> Result<NaiveDateTime, CliErrorKind> {
    let raw = raw.trim();
    NaiveDateTime::from_str(raw)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| CliErrorKind::InvalidReference(raw.to_string()))
}

fn assets(snapshot: &ArgOrStdin<PathBuf>) -> Result<Vec<AssetRecord>, CliError> {
    let reader = snapshot
        .reader()
        .map_err(|e| CliError::with_file(e, snapshot.path()))?;
    let listing: Listing = serde_json::from_reader(reader)
        .map_err(|e| CliError::with_file(e, snapshot.path()))?;
    Ok(listing.into_assets())
}

pub async fn run(args: EvaluateArgs) -> Result<(), CliError> {
    let zone =
        Tz::from_str(args.time_zone.trim()).map_err(|_| CliErrorKind::TimeZone(args.time_zone))?;
    let timestamps = TimestampParser::new(zone, args.date_order);
    let context = match args.at.as_deref() {
        Some(at) => AuditContext::at(reference(at)?, timestamps, args.link_base),
        None => AuditContext::new(timestamps, args.link_base),
    };
    let catalog = Catalog::load(args.catalog.as_deref())
        .map_err(|e| CliError::with_file(e, args.catalog.as_ref()))?;
    let assets = assets(&args.snapshot)?;
    tracing::debug!(assets = assets.len(), reference = %context.reference(), "evaluating");

    let run = audit::run(&assets, &catalog, &context);
    match args.format {
        Format::Json => println!("{}", report::json(&run.warnings)?),
        Format::Html => println!("{}", report::page(&run.warnings)?),
        Format::Email => match report::compose(&run.warnings)? {
            Some(email) => {
                println!("Subject: {}", email.subject);
                println!();
                println!("{}", email.html);
            }
            None => tracing::info!("Nothing to report"),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn reference_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(reference("2024-05-01T08:00:00").unwrap(), expected);
        assert_eq!(reference(" 2024-05-01 08:00:00 ").unwrap(), expected);
        assert!(matches!(
            reference("01/05/2024"),
            Err(CliErrorKind::InvalidReference(_))
        ));
    }
}
