// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::path::PathBuf;

use lastrunlib::catalog::{AuditKind, Catalog};

use crate::{CliError, CliErrorKind};

#[derive(clap::Parser)]
pub struct CatalogArgs {
    /// Catalog file to check. Without it the built-in catalog is checked.
    #[clap(short, long)]
    catalog: Option<PathBuf>,
    /// Print more details while running
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn describe(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    for audit in catalog.audits() {
        let kind = match &audit.kind {
            AuditKind::Inactivity(x) => format!("inactive for more than {} days", x.threshold),
            AuditKind::Version(x) => format!("version {x}"),
        };
        lines.push(format!("{}: {kind}", audit.key));
    }
    if !catalog.freshness_sources().is_empty() {
        lines.push(format!(
            "freshness sources: {}",
            catalog.freshness_sources().join(", ")
        ));
    }
    for custom in catalog.custom() {
        lines.push(format!(
            "{} (org: {}): inactive for more than {} days",
            custom.name, custom.organization_id, custom.inactivity.threshold
        ));
    }
    lines
}

pub async fn run(args: CatalogArgs) -> Result<(), CliError> {
    let catalog = Catalog::load(args.catalog.as_deref())
        .map_err(|e| CliError::with_file(e, args.catalog.as_ref()))?;
    for line in describe(&catalog) {
        println!("{line}");
    }
    let issues = catalog.lint();
    for issue in &issues {
        tracing::warn!("{issue}");
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::with_file(
            CliErrorKind::Lint(issues.len()),
            args.catalog.as_ref(),
        ))
    }
}
