// clean: rebuild records from raw exports, write the three artifacts

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use restitch_engine::header::{canonical_columns, CANONICAL_HEADER};
use restitch_engine::{clean_export, CleanError};
use restitch_io::csv::write_onecol_csv;
use restitch_io::xlsx::{write_onecol_xlsx, write_wide_xlsx, OverflowPolicy, XLSX_CELL_TEXT_LIMIT};

use crate::exit_codes::{clean_status_exit_code, EXIT_EMPTY, EXIT_IO};
use crate::{CliError, OverflowMode};

/// Per-file result, one entry per input in the batch report.
#[derive(Debug, Serialize)]
struct CleanOutcome {
    file: String,
    /// "ok", "empty_input", "no_records", "read_error" or "write_error".
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows_padded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows_merged: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    header_fixes: Vec<String>,
    artifacts: Vec<String>,
    withheld: bool,
}

impl CleanOutcome {
    fn failed(file: &str, status: &'static str, message: String) -> Self {
        Self {
            file: file.to_string(),
            status,
            message: Some(message),
            records: None,
            lines: None,
            rows_padded: None,
            rows_merged: None,
            header_fixes: Vec::new(),
            artifacts: Vec::new(),
            withheld: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct CleanBatch<'a> {
    files: &'a [CleanOutcome],
}

pub fn cmd_clean(
    files: Vec<PathBuf>,
    out_dir: PathBuf,
    overflow: OverflowMode,
    skip_wide: bool,
    json: bool,
) -> Result<(), CliError> {
    if files.is_empty() {
        return Err(CliError::args("no input files given")
            .with_hint("restitch clean <FILE>... [--out-dir DIR]"));
    }

    fs::create_dir_all(&out_dir)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", out_dir.display(), e)))?;

    let policy = match overflow {
        OverflowMode::Split => OverflowPolicy::Split,
        OverflowMode::Withhold => OverflowPolicy::Withhold,
    };

    let mut outcomes = Vec::with_capacity(files.len());
    for path in &files {
        let outcome = clean_one(path, &out_dir, policy, skip_wide);
        report_outcome(&outcome);
        outcomes.push(outcome);
    }

    if json {
        let text = serde_json::to_string_pretty(&CleanBatch { files: &outcomes })
            .map_err(|e| CliError::general(format!("cannot serialize batch report: {}", e)))?;
        println!("{}", text);
    }

    // One bad file fails the batch, but only after every file had its turn.
    // I/O failures outrank empty inputs.
    let failed = outcomes.iter().filter(|o| o.status != "ok").count();
    if outcomes.iter().any(|o| clean_status_exit_code(o.status) == EXIT_IO) {
        return Err(CliError::io(format!("{} of {} files failed", failed, outcomes.len())));
    }
    if outcomes.iter().any(|o| clean_status_exit_code(o.status) == EXIT_EMPTY) {
        return Err(CliError::empty(format!(
            "{} of {} files had nothing to rebuild",
            failed,
            outcomes.len()
        )));
    }
    Ok(())
}

/// Clean one export. Failures land in the outcome instead of aborting the
/// batch; the caller decides the exit code after all files are processed.
fn clean_one(path: &Path, out_dir: &Path, policy: OverflowPolicy, skip_wide: bool) -> CleanOutcome {
    let file_label = path.display().to_string();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_label.clone());

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return CleanOutcome::failed(&file_label, "read_error", format!("cannot read: {}", e));
        }
    };

    let cleaned = match clean_export(&bytes, &filename) {
        Ok(cleaned) => cleaned,
        Err(CleanError::EmptyInput) => {
            return CleanOutcome::failed(&file_label, "empty_input", "no content lines".to_string());
        }
        Err(CleanError::NoRecords) => {
            return CleanOutcome::failed(
                &file_label,
                "no_records",
                "reconstruction produced no records".to_string(),
            );
        }
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());

    // The canonical header always leads; the source header never re-enters.
    let mut final_lines = Vec::with_capacity(cleaned.records.len() + 1);
    final_lines.push(CANONICAL_HEADER.to_string());
    final_lines.extend(cleaned.records.iter().cloned());

    let mut outcome = CleanOutcome {
        file: file_label,
        status: "ok",
        message: None,
        records: Some(cleaned.records.len()),
        lines: Some(cleaned.line_count),
        rows_padded: Some(cleaned.adjustments.padded),
        rows_merged: Some(cleaned.adjustments.merged),
        header_fixes: cleaned.header_fixes.clone(),
        artifacts: Vec::new(),
        withheld: false,
    };

    let csv_path = out_dir.join(format!("{}_final_onecol.csv", stem));
    if let Err(e) = write_onecol_csv(&csv_path, &final_lines) {
        outcome.status = "write_error";
        outcome.message = Some(format!("cannot write {}: {}", csv_path.display(), e));
        return outcome;
    }
    outcome.artifacts.push(csv_path.display().to_string());

    if !skip_wide {
        let wide_path = out_dir.join(format!("{}_final_wide.xlsx", stem));
        if let Err(e) = write_wide_xlsx(&wide_path, &canonical_columns(), &cleaned.rows) {
            outcome.status = "write_error";
            outcome.message = Some(format!("cannot write {}: {}", wide_path.display(), e));
            return outcome;
        }
        outcome.artifacts.push(wide_path.display().to_string());
    }

    let xlsx_path = out_dir.join(format!("{}_final_onecol.xlsx", stem));
    match write_onecol_xlsx(&xlsx_path, &final_lines, policy) {
        Ok(true) => outcome.artifacts.push(xlsx_path.display().to_string()),
        Ok(false) => outcome.withheld = true,
        Err(e) => {
            outcome.status = "write_error";
            outcome.message = Some(format!("cannot write {}: {}", xlsx_path.display(), e));
            return outcome;
        }
    }

    outcome
}

fn report_outcome(outcome: &CleanOutcome) {
    if outcome.status != "ok" {
        let message = outcome.message.as_deref().unwrap_or(outcome.status);
        eprintln!("{}: {}", outcome.file, message);
        return;
    }

    eprintln!(
        "{}: {} records from {} lines",
        outcome.file,
        outcome.records.unwrap_or(0),
        outcome.lines.unwrap_or(0)
    );
    let padded = outcome.rows_padded.unwrap_or(0);
    let merged = outcome.rows_merged.unwrap_or(0);
    if padded > 0 || merged > 0 {
        eprintln!("  note: {} rows padded, {} merged into the last column", padded, merged);
    }
    for fix in &outcome.header_fixes {
        eprintln!("  note: header fix {}", fix);
    }
    for artifact in &outcome.artifacts {
        eprintln!("  -> {}", artifact);
    }
    if outcome.withheld {
        eprintln!(
            "  note: spreadsheet withheld (a cell exceeds {} characters)",
            XLSX_CELL_TEXT_LIMIT
        );
    }
}
