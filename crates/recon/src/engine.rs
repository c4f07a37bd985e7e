use std::collections::BTreeMap;

use crate::aggregate::{aggregate_triage, TriageTotals};
use crate::classify::classify;
use crate::config::ReconcileConfig;
use crate::error::ReconError;
use crate::key::composite_key;
use crate::model::{parse_quantity, ReconMeta, ReconReport, ReconSummary, ReconciledRow, Table};

/// Columns the billing sheet must carry, in canonical upper form.
pub const BILLING_REQUIRED: [&str; 4] = ["NF", "LOCAL", "QTD UND", "CLIENTE"];

/// Columns the physical-count sheet must carry.
pub const TRIAGE_REQUIRED: [&str; 4] =
    ["PALLET", "NOTA FISCAL", "QTDE FÍSICA (BOM)", "QTDE FÍSICA (RUIM)"];

/// Run the billing-vs-count reconciliation.
///
/// Billing rows keep their input order and every kept row appears exactly
/// once in the output, matched or not. A key with no physical-count rows
/// joins against zero sums rather than dropping out.
pub fn run(
    config: &ReconcileConfig,
    billing: &Table,
    triage: &Table,
) -> Result<ReconReport, ReconError> {
    let b = require_columns(billing, &BILLING_REQUIRED)?;
    let t = require_columns(triage, &TRIAGE_REQUIRED)?;
    let (nf_col, local_col, qty_col, client_col) = (b[0], b[1], b[2], b[3]);
    let (pallet_col, invoice_col, good_col, bad_col) = (t[0], t[1], t[2], t[3]);

    let sums = aggregate_triage(triage, pallet_col, invoice_col, good_col, bad_col);

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    let mut unmatched = 0usize;
    let mut finding_counts: BTreeMap<String, usize> = BTreeMap::new();

    for i in 0..billing.rows.len() {
        let nf = billing.cell(i, nf_col).trim();
        let location = billing.cell(i, local_col).trim();
        if nf.is_empty() || location.is_empty() {
            dropped += 1;
            continue;
        }

        let billed = parse_quantity(billing.cell(i, qty_col));
        let key = composite_key(location, nf);
        let (totals, matched) = match sums.get(&key) {
            Some(totals) => (*totals, true),
            None => (TriageTotals::default(), false),
        };
        if !matched {
            unmatched += 1;
        }

        let received = totals.good + totals.bad;
        let delta = received - billed;
        let finding = classify(billed, totals.good, totals.bad, received);
        *finding_counts.entry(finding.label().to_string()).or_insert(0) += 1;

        rows.push(ReconciledRow {
            nf: nf.to_string(),
            client: billing.cell(i, client_col).trim().to_string(),
            location: location.to_string(),
            billed,
            key,
            good: totals.good,
            bad: totals.bad,
            received,
            delta,
            finding,
            matched,
            billed_total_cents: billed * config.unit_price_cents,
            charge_total_cents: delta * config.unit_price_cents,
        });
    }

    let summary = ReconSummary {
        billing_rows: billing.rows.len(),
        dropped_rows: dropped,
        triage_rows: triage.rows.len(),
        triage_keys: sums.len(),
        unmatched,
        finding_counts,
    };

    Ok(ReconReport {
        meta: ReconMeta {
            billing_table: billing.name.clone(),
            triage_table: triage.name.clone(),
            unit_price_cents: config.unit_price_cents,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows,
    })
}

/// Resolve every required column or fail with the full missing list.
fn require_columns(table: &Table, required: &[&str]) -> Result<Vec<usize>, ReconError> {
    let mut indexes = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match table.column_index(name) {
            Some(i) => indexes.push(i),
            None => missing.push((*name).to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(ReconError::MissingColumns {
            table: table.name.clone(),
            missing,
            found: table.columns.clone(),
        });
    }
    Ok(indexes)
}
