//! Quote-aware column splitting and width reconciliation.

use serde::Serialize;

/// Split one record on commas, honoring quoted sections and `""` escapes.
///
/// Fields come back trimmed. A record the parser cannot read at all degrades
/// to a single field holding the whole record, so a malformed row never
/// aborts the batch.
pub fn split_record(record: &str) -> Vec<String> {
    let parsed = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(record.as_bytes())
        .records()
        .next();
    match parsed {
        Some(Ok(fields)) => fields.iter().map(str::to_string).collect(),
        Some(Err(_)) => vec![record.trim().to_string()],
        // The reader yields nothing for an empty record; one empty field
        // keeps the row present downstream.
        None => vec![record.trim().to_string()],
    }
}

/// Counters for rows whose field count did not match the canonical width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WidthAdjustments {
    /// Rows right-padded with empty fields.
    pub padded: usize,
    /// Rows whose excess fields were folded back into the last column.
    pub merged: usize,
    /// Total excess fields folded across all merged rows.
    pub merged_fields: usize,
}

impl WidthAdjustments {
    pub fn is_clean(&self) -> bool {
        self.padded == 0 && self.merged == 0
    }
}

/// Force `fields` to exactly `width` columns, counting what was changed.
///
/// Shorter rows are right-padded with empty strings. Longer rows keep the
/// first `width - 1` fields and rejoin the excess into the final field with
/// the delimiter: surplus commas belong to the last logical column, never to
/// a dropped one. `width` must be at least 1.
pub fn reconcile_width(
    mut fields: Vec<String>,
    width: usize,
    adjustments: &mut WidthAdjustments,
) -> Vec<String> {
    use std::cmp::Ordering;

    match fields.len().cmp(&width) {
        Ordering::Equal => fields,
        Ordering::Less => {
            adjustments.padded += 1;
            fields.resize(width, String::new());
            fields
        }
        Ordering::Greater => {
            adjustments.merged += 1;
            adjustments.merged_fields += fields.len() - width;
            let tail = fields.split_off(width - 1).join(",");
            fields.push(tail);
            fields
        }
    }
}
