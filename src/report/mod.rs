// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Renders warnings as JSON, as an HTML page or as the body of a notification.

mod email;
mod html;

use serde::Serialize;
use tera::Tera;
use thiserror::Error;

pub use email::{Email, compose};
pub use html::{page, tables};

use crate::models::Warning;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to render template: {0}")]
    Template(#[from] tera::Error),
    #[error("Unable to serialize warnings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes warnings into a JSON array.
pub fn json(warnings: &[Warning]) -> Result<String, Error> {
    Ok(serde_json::to_string(warnings)?)
}

/// Warnings of a single organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationGroup<'a> {
    pub org_id: i64,
    pub org_name: &'a str,
    /// Link of the first warning of the organization.
    pub link: &'a str,
    pub warnings: Vec<&'a Warning>,
}

/// Groups warnings by organization id in order of first appearance.
pub fn group_by_organization(warnings: &[Warning]) -> Vec<OrganizationGroup<'_>> {
    let mut groups: Vec<OrganizationGroup<'_>> = Vec::new();
    for warning in warnings {
        match groups.iter_mut().find(|x| x.org_id == warning.org_id) {
            Some(group) => group.warnings.push(warning),
            None => groups.push(OrganizationGroup {
                org_id: warning.org_id,
                org_name: &warning.org_name,
                link: &warning.link,
                warnings: vec![warning],
            }),
        }
    }
    groups
}

#[derive(Serialize)]
struct Row<'a> {
    error: &'a str,
    error_details: &'a str,
    current_value: &'a str,
    test_value: &'a str,
    test_value_label: &'static str,
    possible_servers: &'a str,
}

#[derive(Serialize)]
struct Group<'a> {
    org_name: &'a str,
    link: &'a str,
    warnings: Vec<Row<'a>>,
}

fn template_groups(warnings: &[Warning]) -> Vec<Group<'_>> {
    group_by_organization(warnings)
        .into_iter()
        .map(|group| Group {
            org_name: group.org_name,
            link: group.link,
            warnings: group
                .warnings
                .into_iter()
                .map(|x| Row {
                    error: &x.error,
                    error_details: &x.error_details,
                    current_value: &x.current_value,
                    test_value: &x.test_value,
                    test_value_label: x.kind.test_value_label(),
                    possible_servers: &x.possible_servers,
                })
                .collect(),
        })
        .collect()
}

/// Templates are autoescaped because of their `.html` suffix.
fn engine() -> Result<Tera, Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("style.css", include_str!("templates/style.css")),
        ("tables.html", include_str!("templates/tables.html")),
        ("page.html", include_str!("templates/page.html")),
        ("email.html", include_str!("templates/email.html")),
    ])?;
    Ok(tera)
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::models::{Warning, WarningKind};

    pub fn warning(org_id: i64, error: &str, kind: WarningKind) -> Warning {
        Warning {
            org_id,
            org_name: format!("Org {org_id}"),
            error: error.to_string(),
            error_details: format!("details of {error}"),
            test_value: "20".to_string(),
            current_value: "31".to_string(),
            link: format!("https://docs.example.com/{org_id}/assets/records/1"),
            possible_servers: "SRV01".to_string(),
            kind,
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let warnings = vec![
            warning(2, "a", WarningKind::Inactivity),
            warning(1, "b", WarningKind::Inactivity),
            warning(2, "c", WarningKind::Version),
        ];
        let groups = super::group_by_organization(&warnings);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].org_id, 2);
        assert_eq!(groups[0].warnings.len(), 2);
        assert_eq!(groups[0].warnings[1].error, "c");
        assert_eq!(groups[1].org_name, "Org 1");
    }

    #[test]
    fn json_is_an_array() {
        assert_eq!(super::json(&[]).unwrap(), "[]");
        let json = super::json(&[warning(1, "a", WarningKind::Inactivity)]).unwrap();
        let parsed: Vec<Warning> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].org_id, 1);
        assert!(json.contains("\"possibleServers\":\"SRV01\""));
    }
}
