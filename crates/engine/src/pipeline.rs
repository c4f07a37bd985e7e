//! End-to-end cleanup of one export file.

use serde::Serialize;

use crate::columns::{self, WidthAdjustments};
use crate::decode;
use crate::error::CleanError;
use crate::header;
use crate::rebuild;
use crate::splitter;

/// Everything produced by cleaning one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedExport {
    /// Rebuilt logical records, in input order. The source header line is
    /// not among them.
    pub records: Vec<String>,
    /// Canonical-width rows, one per record, in the same order.
    pub rows: Vec<Vec<String>>,
    /// The source file's own header line, after filename-keyed fixes.
    pub source_header: String,
    /// Which header fixes fired, for the run summary.
    pub header_fixes: Vec<String>,
    /// Width counters accumulated while exploding records into rows.
    pub adjustments: WidthAdjustments,
    /// Physical lines that survived trimming, header line included.
    pub line_count: usize,
}

/// Clean one raw export: decode, split, rebuild, explode into rows.
///
/// The first extracted field is the source header. It is corrected and
/// reported but never part of the rebuilt body; output always carries
/// [`header::CANONICAL_HEADER`].
pub fn clean_export(bytes: &[u8], filename: &str) -> Result<CleanedExport, CleanError> {
    let text = decode::normalize_newlines(&decode::decode_bytes(bytes));
    let lines = splitter::content_lines(&text);
    if lines.is_empty() {
        return Err(CleanError::EmptyInput);
    }

    let fields: Vec<&str> = lines.iter().map(|line| splitter::first_field(line)).collect();
    let (source_header, header_fixes) = header::normalize_header(fields[0], filename);

    let records = rebuild::rebuild_records(&fields[1..]);
    if records.is_empty() {
        return Err(CleanError::NoRecords);
    }

    let width = header::canonical_width();
    let mut adjustments = WidthAdjustments::default();
    let rows = records
        .iter()
        .map(|record| columns::reconcile_width(columns::split_record(record), width, &mut adjustments))
        .collect();

    Ok(CleanedExport {
        records,
        rows,
        source_header,
        header_fixes,
        adjustments,
        line_count: lines.len(),
    })
}
