use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};

use restitch_recon::model::{ReconReport, Table};

/// Hard per-cell character ceiling in the xlsx format.
pub const XLSX_CELL_TEXT_LIMIT: usize = 32_767;

/// Characters held back from each chunk for the `__PART_{n}__` marker.
const PART_SUFFIX_RESERVE: usize = 12;

/// Sheet name for both cleaned artifacts.
const DATA_SHEET: &str = "Dados";

/// Column order of the reconciliation report artifact.
pub const REPORT_COLUMNS: [&str; 13] = [
    "NF",
    "CLIENTE",
    "LOCAL",
    "QTD UND",
    "CHAVE (PALLET+NF)",
    "QTDE FÍSICA (BOM)",
    "QTDE FÍSICA (RUIM)",
    "CONCAT_DEV",
    "DIFERENÇA",
    "Observação PSD",
    "Valor Unitário",
    "Total Nota",
    "Total Cobrança",
];

/// What to do when a record's text exceeds [`XLSX_CELL_TEXT_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Oversized cells become consecutively numbered `__PART_{n}__` chunks.
    Split,
    /// The spreadsheet artifact is skipped; the CSV artifact stands alone.
    Withhold,
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Why a workbook table could not be loaded. Splitting the two cases lets
/// callers treat a wrong-shaped workbook differently from a broken file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadTableError {
    /// Workbook could not be opened or a sheet could not be read.
    Io(String),
    /// No sheet name contains any of the wanted keywords.
    SheetNotFound {
        wanted: Vec<String>,
        available: Vec<String>,
    },
}

impl fmt::Display for ReadTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "{}", msg),
            Self::SheetNotFound { wanted, available } => {
                let available = if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(", ")
                };
                write!(
                    f,
                    "no sheet name contains any of [{}]; available sheets: {}",
                    wanted.join(", "),
                    available
                )
            }
        }
    }
}

impl std::error::Error for ReadTableError {}

/// Load the first sheet whose name contains any of `keywords`,
/// case-insensitively, as an all-text table. The first row becomes the
/// column header set. An empty keyword list selects the first sheet.
pub fn read_table(path: &Path, keywords: &[String]) -> Result<Table, ReadTableError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReadTableError::Io(format!("Failed to open Excel file: {}", e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names
        .iter()
        .find(|name| {
            if keywords.is_empty() {
                return true;
            }
            let lower = name.to_lowercase();
            keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
        })
        .cloned()
        .ok_or_else(|| ReadTableError::SheetNotFound {
            wanted: keywords.to_vec(),
            available: sheet_names.clone(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReadTableError::Io(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut row_iter = range.rows();
    let columns: Vec<String> = match row_iter.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<String>> = row_iter
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Table::new(sheet_name, columns, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Write the exploded-column artifact: header row plus one row per record.
pub fn write_wide_xlsx(
    path: &Path,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(DATA_SHEET)
        .map_err(|e| format!("Failed to create sheet '{}': {}", DATA_SHEET, e))?;

    for (col, name) in columns.iter().enumerate() {
        put_string(worksheet, 0, col as u16, name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            put_string(worksheet, (i + 1) as u32, col as u16, value)?;
        }
    }

    workbook.save(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Write the single-column spreadsheet artifact under the overflow policy.
///
/// Returns `Ok(false)` when the policy withholds the file because some line
/// exceeds the cell ceiling; the artifact is then not created at all.
pub fn write_onecol_xlsx(
    path: &Path,
    lines: &[String],
    policy: OverflowPolicy,
) -> Result<bool, String> {
    let oversized = lines.iter().any(|l| l.chars().count() > XLSX_CELL_TEXT_LIMIT);
    if oversized && policy == OverflowPolicy::Withhold {
        return Ok(false);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(DATA_SHEET)
        .map_err(|e| format!("Failed to create sheet '{}': {}", DATA_SHEET, e))?;

    let step = XLSX_CELL_TEXT_LIMIT - PART_SUFFIX_RESERVE;
    let mut row = 0u32;
    for line in lines {
        if line.chars().count() <= XLSX_CELL_TEXT_LIMIT {
            put_string(worksheet, row, 0, line)?;
            row += 1;
        } else {
            for (part, chunk) in split_cell_text(line, step).iter().enumerate() {
                let suffixed = format!("{}__PART_{}__", chunk, part + 1);
                put_string(worksheet, row, 0, &suffixed)?;
                row += 1;
            }
        }
    }

    workbook.save(path).map_err(|e| e.to_string())?;
    Ok(true)
}

/// Chunk on char boundaries, at most `step` chars per chunk.
fn split_cell_text(line: &str, step: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(step)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        chunks.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    chunks
}

/// Write the reconciliation report with its fixed column order. Quantities
/// land as numbers, money columns as decimal currency values.
pub fn write_recon_report(path: &Path, report: &ReconReport) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name("Análise")
        .map_err(|e| format!("Failed to create sheet 'Análise': {}", e))?;

    for (col, name) in REPORT_COLUMNS.iter().enumerate() {
        put_string(worksheet, 0, col as u16, name)?;
    }

    let unit_price = cents_to_value(report.meta.unit_price_cents);
    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        put_string(worksheet, r, 0, &row.nf)?;
        put_string(worksheet, r, 1, &row.client)?;
        put_string(worksheet, r, 2, &row.location)?;
        put_number(worksheet, r, 3, row.billed as f64)?;
        put_string(worksheet, r, 4, &row.key)?;
        put_number(worksheet, r, 5, row.good as f64)?;
        put_number(worksheet, r, 6, row.bad as f64)?;
        put_number(worksheet, r, 7, row.received as f64)?;
        put_number(worksheet, r, 8, row.delta as f64)?;
        put_string(worksheet, r, 9, row.finding.label())?;
        put_number(worksheet, r, 10, unit_price)?;
        put_number(worksheet, r, 11, cents_to_value(row.billed_total_cents))?;
        put_number(worksheet, r, 12, cents_to_value(row.charge_total_cents))?;
    }

    workbook.save(path).map_err(|e| e.to_string())?;
    Ok(())
}

fn put_string(ws: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<(), String> {
    ws.write_string(row, col, text)
        .map(|_| ())
        .map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))
}

fn put_number(ws: &mut Worksheet, row: u32, col: u16, value: f64) -> Result<(), String> {
    ws.write_number(row, col, value)
        .map(|_| ())
        .map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))
}

fn cents_to_value(cents: i64) -> f64 {
    cents as f64 / 100.0
}
