// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use chrono::NaiveDateTime;

use crate::{
    catalog::{Audit, AuditKind, Catalog, CustomAudit, Message, Threshold, VersionAudit},
    models::{AssetRecord, Warning, WarningKind},
    parse::{DottedVersion, Parsed, TimestampParser, day_difference},
};

use super::{AuditContext, Outcome, Skip, extract};

/// Decides whether a single audit fires for a single asset.
pub struct Evaluator<'a> {
    catalog: &'a Catalog,
    context: &'a AuditContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a Catalog, context: &'a AuditContext) -> Self {
        Self { catalog, context }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    fn timestamps(&self) -> &TimestampParser {
        self.context.timestamps()
    }

    /// Evaluates an audit of the catalog against the trait of the same key.
    pub fn evaluate(&self, asset: &AssetRecord, audit: &Audit) -> Outcome {
        if asset.traits.monitoring_disabled(&audit.key) {
            tracing::debug!(trait_key = %audit.key, org = asset.organization_id, "monitoring disabled");
            return Outcome::Skipped(Skip::MonitoringDisabled);
        }
        let raw = match asset.traits.text(&audit.key) {
            Parsed::Valid(x) => x,
            Parsed::Absent => return Outcome::Skipped(Skip::TraitAbsent),
            Parsed::Malformed(x) => {
                tracing::warn!(
                    value = %x,
                    trait_key = %audit.key,
                    org = asset.organization_id,
                    "Trait is not text"
                );
                return Outcome::Skipped(Skip::MalformedTrait(x));
            }
        };
        match &audit.kind {
            AuditKind::Version(definition) => self.version(asset, audit, definition, raw),
            AuditKind::Inactivity(definition) => match self.timestamps().parse(raw) {
                Parsed::Valid(observed) => self.inactivity(
                    asset,
                    &audit.key,
                    &definition.threshold,
                    &audit.message,
                    observed,
                ),
                Parsed::Absent | Parsed::Malformed(_) => {
                    tracing::warn!(
                        value = raw,
                        trait_key = %audit.key,
                        org = asset.organization_id,
                        "Not a date"
                    );
                    Outcome::Skipped(Skip::MalformedTrait(raw.to_string()))
                }
            },
        }
    }

    /// Evaluates a custom audit against the custom scripts text of the asset.
    pub fn evaluate_custom(&self, asset: &AssetRecord, audit: &CustomAudit, text: &str) -> Outcome {
        if asset.traits.monitoring_disabled(&audit.name) {
            tracing::debug!(script = %audit.name, org = asset.organization_id, "monitoring disabled");
            return Outcome::Skipped(Skip::MonitoringDisabled);
        }
        let extraction = extract::latest_run(text, &audit.name, self.timestamps());
        for value in &extraction.rejected {
            tracing::warn!(
                value = %value,
                script = %audit.name,
                org = asset.organization_id,
                "Not a date"
            );
        }
        match extraction.latest {
            Some(observed) => self.inactivity(
                asset,
                &audit.name,
                &audit.inactivity.threshold,
                &audit.message,
                observed,
            ),
            None => Outcome::Skipped(Skip::ScriptNotFound),
        }
    }

    /// Most recent run of the user audit of the asset.
    pub fn freshness(&self, asset: &AssetRecord) -> Option<NaiveDateTime> {
        self.catalog
            .freshness_sources()
            .iter()
            .filter_map(|key| asset.traits.text(key).valid())
            .filter_map(|raw| self.timestamps().parse(raw).valid())
            .max()
    }

    fn version(
        &self,
        asset: &AssetRecord,
        audit: &Audit,
        definition: &VersionAudit,
        raw: &str,
    ) -> Outcome {
        let current = match DottedVersion::extract(raw) {
            Parsed::Valid(x) => x,
            Parsed::Absent | Parsed::Malformed(_) => {
                tracing::warn!(
                    value = raw,
                    trait_key = %audit.key,
                    org = asset.organization_id,
                    "Not a proper version"
                );
                return Outcome::Skipped(Skip::MalformedTrait(raw.to_string()));
            }
        };
        let (latest, updated_on) = match (definition.latest(), definition.updated_on()) {
            (Parsed::Valid(latest), Parsed::Valid(updated_on)) => (latest, updated_on),
            (Parsed::Malformed(x), _) | (_, Parsed::Malformed(x)) => {
                tracing::warn!(value = %x, trait_key = %audit.key, "Invalid version definition");
                return Outcome::Skipped(Skip::MalformedDefinition(x));
            }
            _ => return Outcome::Skipped(Skip::MalformedDefinition(String::new())),
        };
        let Some(freshness) = self.freshness(asset) else {
            tracing::debug!(
                trait_key = %audit.key,
                org = asset.organization_id,
                "no user audit run found, version is not compared"
            );
            return Outcome::Passed;
        };
        if current != latest && freshness > updated_on {
            Outcome::Fired(self.warning(
                asset,
                &audit.message,
                latest.to_string(),
                current.to_string(),
                WarningKind::Version,
            ))
        } else {
            Outcome::Passed
        }
    }

    fn inactivity(
        &self,
        asset: &AssetRecord,
        key: &str,
        threshold: &Threshold,
        message: &Message,
        observed: NaiveDateTime,
    ) -> Outcome {
        let days = match threshold.days() {
            Parsed::Valid(x) => x,
            Parsed::Absent | Parsed::Malformed(_) => {
                tracing::warn!(
                    value = %threshold,
                    trait_key = key,
                    org = asset.organization_id,
                    "Inactive-days is not an int"
                );
                return Outcome::Skipped(Skip::MalformedDefinition(threshold.to_string()));
            }
        };
        let difference = day_difference(self.context.reference(), observed);
        if difference > days {
            Outcome::Fired(self.warning(
                asset,
                message,
                days.to_string(),
                difference.to_string(),
                WarningKind::Inactivity,
            ))
        } else {
            Outcome::Passed
        }
    }

    fn warning(
        &self,
        asset: &AssetRecord,
        message: &Message,
        test_value: String,
        current_value: String,
        kind: WarningKind,
    ) -> Warning {
        let possible_servers = asset
            .traits
            .text(&self.catalog.settings().possible_servers_trait)
            .valid()
            .unwrap_or_default()
            .to_string();
        Warning {
            org_id: asset.organization_id,
            org_name: asset.organization_name.clone(),
            error: message.error.clone(),
            error_details: message.error_details.clone(),
            test_value,
            current_value,
            link: asset.link(self.context.link_base()),
            possible_servers,
            kind,
        }
    }
}
