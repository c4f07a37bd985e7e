// reconcile: join billed quantities against physical counts, write the report

use std::fs;
use std::path::{Path, PathBuf};

use restitch_io::xlsx::{read_table, write_recon_report};
use restitch_recon::{run, ReconError, ReconcileConfig};

use crate::{table_error, CliError};

const DEFAULT_REPORT: &str = "analise_cobranca_triagem.xlsx";

pub fn cmd_reconcile(
    billing: PathBuf,
    triage: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;

    let billing_table =
        read_table(&billing, &config.billing_keywords).map_err(|e| table_error(&billing, e))?;
    let triage_table =
        read_table(&triage, &config.triage_keywords).map_err(|e| table_error(&triage, e))?;

    let report = run(&config, &billing_table, &triage_table).map_err(|e| match e {
        ReconError::MissingColumns { .. } => CliError::schema(e.to_string()),
        other => CliError::args(other.to_string()),
    })?;

    let out_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT));
    write_recon_report(&out_path, &report)
        .map_err(|e| CliError::io(format!("cannot write {}: {}", out_path.display(), e)))?;

    eprintln!(
        "billing '{}': {} rows ({} dropped for missing NF/LOCAL)",
        report.meta.billing_table, report.summary.billing_rows, report.summary.dropped_rows
    );
    eprintln!(
        "counts '{}': {} rows over {} keys",
        report.meta.triage_table, report.summary.triage_rows, report.summary.triage_keys
    );
    eprintln!(
        "reconciled {} rows, {} without any physical count",
        report.rows.len(),
        report.summary.unmatched
    );
    for (label, count) in &report.summary.finding_counts {
        eprintln!("  {}: {}", label, count);
    }
    eprintln!("-> {}", out_path.display());

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("cannot serialize report: {}", e)))?;
        println!("{}", text);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReconcileConfig, CliError> {
    match path {
        None => Ok(ReconcileConfig::default()),
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read {}: {}", path.display(), e)))?;
            ReconcileConfig::from_toml(&text).map_err(|e| {
                CliError::args(format!("{}: {}", path.display(), e)).with_hint(
                    "accepted keys: unit_price_cents, billing_keywords, triage_keywords",
                )
            })
        }
    }
}
