// inspect: preview which sheet and columns an input would present

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use restitch_engine::{decode, splitter};
use restitch_io::xlsx::read_table;

use crate::{table_error, CliError};

#[derive(Debug, Serialize)]
struct InspectOutput {
    file: String,
    /// Absent for semicolon exports, which have no sheets.
    #[serde(skip_serializing_if = "Option::is_none")]
    sheet: Option<String>,
    rows: usize,
    columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
}

pub fn cmd_inspect(
    file: PathBuf,
    keywords: Vec<String>,
    require: Vec<String>,
    json: bool,
) -> Result<(), CliError> {
    let (sheet, columns, rows) = if is_workbook(&file) {
        let table = read_table(&file, &keywords).map_err(|e| table_error(&file, e))?;
        (Some(table.name), table.columns, table.rows.len())
    } else {
        if !keywords.is_empty() {
            return Err(CliError::args("--keyword only applies to workbooks")
                .with_hint("semicolon exports have no sheets"));
        }
        semicolon_header(&file)?
    };

    // Lookups take the canonical upper form, same as reconciliation.
    let missing: Vec<String> = require
        .iter()
        .map(|name| name.trim().to_uppercase())
        .filter(|name| !columns.contains(name))
        .collect();

    let output = InspectOutput {
        file: file.display().to_string(),
        sheet,
        rows,
        columns,
        missing: missing.clone(),
    };

    if json {
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::general(format!("cannot serialize: {}", e)))?;
        println!("{}", text);
    } else {
        if let Some(sheet) = &output.sheet {
            println!("sheet:   {}", sheet);
        }
        println!("rows:    {}", output.rows);
        println!("columns: {}", output.columns.join(", "));
        if !missing.is_empty() {
            println!("missing: {}", missing.join(", "));
        }
    }

    if !missing.is_empty() {
        return Err(CliError::schema(format!(
            "{}: missing required column(s): {}",
            file.display(),
            missing.join(", ")
        )));
    }
    Ok(())
}

fn is_workbook(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref(),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods")
    )
}

/// Columns of a raw `;`-separated export, decoded the way the cleaner
/// decodes it. Rows are the content lines after the header.
fn semicolon_header(file: &Path) -> Result<(Option<String>, Vec<String>, usize), CliError> {
    let bytes = fs::read(file)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", file.display(), e)))?;
    let text = decode::normalize_newlines(&decode::decode_bytes(&bytes));
    let lines = splitter::content_lines(&text);
    if lines.is_empty() {
        return Err(CliError::empty(format!("{}: no content lines", file.display())));
    }
    let columns = lines[0].split(';').map(|name| name.trim().to_uppercase()).collect();
    Ok((None, columns, lines.len() - 1))
}
