// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use crate::{
    catalog::Catalog,
    models::{AssetError, AssetRecord, Warning},
    parse::Parsed,
};

use super::{AuditContext, Evaluator, Outcome};

/// Result of evaluating a listing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditRun {
    /// Warnings in asset order, then catalog order, then custom audit order.
    pub warnings: Vec<Warning>,
    pub assets_evaluated: usize,
    /// Assets that were not evaluated because of an invalid id.
    pub assets_skipped: usize,
}

/// Evaluates every audit that applies to an asset.
pub fn audit_asset(evaluator: &Evaluator, asset: &AssetRecord) -> Result<Vec<Warning>, AssetError> {
    asset.numeric_id()?;
    let catalog = evaluator.catalog();
    let mut warnings = Vec::new();
    let mut collect = |outcome: Outcome| {
        if let Outcome::Fired(warning) = outcome {
            warnings.push(warning);
        }
    };
    for audit in catalog.audits() {
        collect(evaluator.evaluate(asset, audit));
    }

    let custom = catalog.custom_for(asset.organization_id);
    if !custom.is_empty() {
        let key = &catalog.settings().custom_scripts_trait;
        match asset.traits.text(key) {
            Parsed::Valid(text) => {
                for audit in custom {
                    collect(evaluator.evaluate_custom(asset, audit, text));
                }
            }
            Parsed::Absent => {
                tracing::debug!(
                    asset_id = %asset.id,
                    org = asset.organization_id,
                    "no custom scripts"
                );
            }
            Parsed::Malformed(x) => {
                tracing::warn!(
                    value = %x,
                    trait_key = %key,
                    org = asset.organization_id,
                    "Custom scripts are not text"
                );
            }
        }
    }
    Ok(warnings)
}

/// Evaluates all assets.
///
/// An asset with an invalid id is logged and skipped, the others are still evaluated.
pub fn run(assets: &[AssetRecord], catalog: &Catalog, context: &AuditContext) -> AuditRun {
    let evaluator = Evaluator::new(catalog, context);
    let mut result = AuditRun::default();
    for asset in assets {
        match audit_asset(&evaluator, asset) {
            Ok(warnings) => {
                tracing::debug!(
                    asset_id = %asset.id,
                    org = asset.organization_id,
                    warnings = warnings.len(),
                    "evaluated"
                );
                result.assets_evaluated += 1;
                result.warnings.extend(warnings);
            }
            Err(e) => {
                tracing::warn!(error = %e, org = asset.organization_id, "Skipping asset");
                result.assets_skipped += 1;
            }
        }
    }
    tracing::info!(
        assets = assets.len(),
        skipped = result.assets_skipped,
        warnings = result.warnings.len(),
        reference = %context.reference(),
        "audit finished"
    );
    result
}
