// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use tera::Context;

use crate::models::Warning;

use super::{Error, engine, template_groups};

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub html: String,
}

/// Composes the notification, `None` when there is nothing to report.
pub fn compose(warnings: &[Warning]) -> Result<Option<Email>, Error> {
    if warnings.is_empty() {
        return Ok(None);
    }
    let count = warnings.len();
    let mut context = Context::new();
    context.insert(
        "intro",
        &format!("The monitoring agent found {count} issues that need to be resolved."),
    );
    context.insert("groups", &template_groups(warnings));
    let html = engine()?.render("email.html", &context)?;
    Ok(Some(Email {
        subject: format!("The Monitoring Agent found {count} Issues"),
        html,
    }))
}
