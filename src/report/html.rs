// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use tera::Context;

use crate::models::Warning;

use super::{Error, engine, template_groups};

/// Renders a standalone page, a "no issues" page when there are no warnings.
pub fn page(warnings: &[Warning]) -> Result<String, Error> {
    let mut context = Context::new();
    context.insert("count", &warnings.len());
    context.insert("groups", &template_groups(warnings));
    Ok(engine()?.render("page.html", &context)?)
}

/// Renders the per organization tables without a surrounding document.
pub fn tables(warnings: &[Warning]) -> Result<String, Error> {
    if warnings.is_empty() {
        return Ok(String::new());
    }
    let mut context = Context::new();
    context.insert("groups", &template_groups(warnings));
    Ok(engine()?.render("tables.html", &context)?)
}
