// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use chrono::{NaiveDate, NaiveDateTime};
use lastrunlib::{
    audit::{self, AuditContext},
    catalog::Catalog,
    models::{Listing, WarningKind},
    parse::TimestampParser,
    report,
};

const CATALOG: &str = r#"
[[audit]]
key = "autodoc-last-ran"
inactive-days = 2
error = "AutoDoc has not run recently"

[[audit]]
key = "autodoc-version"
latest-version = "3.2"
version-updated-on = "01/01/2024"
error = "AutoDoc Version is outdated"

[[audit]]
key = "user-audit-last-ran"
inactive-days = 35
error = "[User Audit] The User Audit has not run recently"

[[audit]]
key = "device-audit-last-ran"
inactive-days = 8
error = "The Device Audit has not run recently"

[[custom]]
organization-id = 10
name = "BackupScript"
inactive-days = 7
error = "The Backup Script has not run recently"
"#;

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn run() -> audit::AuditRun {
    let listing: Listing =
        serde_json::from_str(include_str!("data/listing.json")).expect("fixture is valid");
    let assets = listing.into_assets();
    assert_eq!(assets.len(), 3, "record without organization is dropped");
    let catalog = Catalog::from_toml(CATALOG).unwrap();
    let context = AuditContext::at(
        reference(),
        TimestampParser::default(),
        "https://contoso.itglue.com/",
    );
    audit::run(&assets, &catalog, &context)
}

#[test]
fn evaluates_snapshot() {
    let run = run();
    assert_eq!(run.assets_evaluated, 2);
    assert_eq!(run.assets_skipped, 1);

    let summary = run
        .warnings
        .iter()
        .map(|w| {
            (
                w.org_id,
                w.error.as_str(),
                w.test_value.as_str(),
                w.current_value.as_str(),
                w.kind,
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            (
                10,
                "AutoDoc has not run recently",
                "2",
                "6",
                WarningKind::Inactivity
            ),
            (
                10,
                "AutoDoc Version is outdated",
                "3.2",
                "3.1",
                WarningKind::Version
            ),
            (
                10,
                "The Backup Script has not run recently",
                "7",
                "29",
                WarningKind::Inactivity
            ),
        ]
    );
    for warning in &run.warnings {
        assert_eq!(warning.possible_servers, "DC01, FS01");
        assert_eq!(
            warning.link,
            "https://contoso.itglue.com/10/assets/records/1001"
        );
    }
}

#[test]
fn renders_snapshot() {
    let run = run();

    let json: serde_json::Value =
        serde_json::from_str(&report::json(&run.warnings).unwrap()).unwrap();
    assert_eq!(json.as_array().map(|x| x.len()), Some(3));
    assert_eq!(json[1]["testValue"], "3.2");
    assert_eq!(json[1]["orgName"], "Contoso");

    let page = report::page(&run.warnings).unwrap();
    assert!(page.contains("3 Issues Found!"));
    assert!(page.contains("Expected Version"));
    assert!(page.contains("Threshold in Days"));

    let email = report::compose(&run.warnings).unwrap().unwrap();
    assert_eq!(email.subject, "The Monitoring Agent found 3 Issues");
    assert!(
        email
            .html
            .contains("The monitoring agent found 3 issues that need to be resolved.")
    );
}
