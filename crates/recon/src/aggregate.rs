use std::collections::BTreeMap;

use crate::key::composite_key;
use crate::model::{parse_quantity, Table};

/// Physical-count sums for one composite key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriageTotals {
    pub good: i64,
    pub bad: i64,
}

/// Sum the physical counts per composite key. Rows whose pallet and invoice
/// both carry no digits land under the empty key like any other.
pub fn aggregate_triage(
    table: &Table,
    pallet_col: usize,
    invoice_col: usize,
    good_col: usize,
    bad_col: usize,
) -> BTreeMap<String, TriageTotals> {
    let mut sums: BTreeMap<String, TriageTotals> = BTreeMap::new();

    for row in 0..table.rows.len() {
        let key = composite_key(table.cell(row, pallet_col), table.cell(row, invoice_col));
        let entry = sums.entry(key).or_default();
        entry.good += parse_quantity(table.cell(row, good_col));
        entry.bad += parse_quantity(table.cell(row, bad_col));
    }

    sums
}
