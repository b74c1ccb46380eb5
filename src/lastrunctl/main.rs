// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

mod catalog;
mod error;
mod evaluate;
mod utils;

use catalog::CatalogArgs;
use clap::Parser;
pub use error::*;
use evaluate::EvaluateArgs;

/// Evaluates saved asset listings and checks catalogs without contacting any service.
#[derive(clap::Parser)]
#[command(name = "lastrunctl", version)]
enum Args {
    /// Evaluates a saved asset listing and prints the report.
    Evaluate(EvaluateArgs),
    /// Loads and checks a catalog.
    Catalog(CatalogArgs),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let verbose = match &args {
        Args::Evaluate(args) => args.verbose,
        Args::Catalog(args) => args.verbose,
    };
    set_logging(verbose);

    if let Err(e) = run(args).await {
        tracing::warn!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    match args {
        Args::Evaluate(args) => evaluate::run(args).await,
        Args::Catalog(args) => catalog::run(args).await,
    }
}

pub fn set_logging(level: u8) {
    let lv = if level > 1 {
        tracing::Level::TRACE
    } else if level > 0 {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(lv)
        .init();
}
