use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One sheet loaded from a workbook, all cells as text.
///
/// Column names are trimmed and uppercased on construction; lookups take the
/// canonical upper form. Row cells keep their original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns = columns.iter().map(|c| c.trim().to_uppercase()).collect();
        Self { name: name.into(), columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell text at (row, col); absent cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Total parse of a quantity cell: trim, decimal comma accepted, fractional
/// values rounded, empty or unparseable text reads as zero.
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) => v.round() as i64,
        Err(_) => 0,
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Reconciliation verdict for one billing row. Serialized and displayed with
/// the operator-facing label the downstream report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Finding {
    #[serde(rename = "Informação incorreta - Devemos pagar mais")]
    ShouldPayMore,
    #[serde(rename = "Cobrança indevida - Quantidade menor recebida")]
    ImproperCharge,
    #[serde(rename = "Sobra cliente")]
    CustomerSurplus,
    #[serde(rename = "Digitou errado")]
    EntryError,
    #[serde(rename = "Não recebemos nada")]
    NothingReceived,
    #[serde(rename = "Correto")]
    Correct,
}

impl Finding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShouldPayMore => "Informação incorreta - Devemos pagar mais",
            Self::ImproperCharge => "Cobrança indevida - Quantidade menor recebida",
            Self::CustomerSurplus => "Sobra cliente",
            Self::EntryError => "Digitou errado",
            Self::NothingReceived => "Não recebemos nada",
            Self::Correct => "Correto",
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One billing row joined against the aggregated physical counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRow {
    pub nf: String,
    pub client: String,
    pub location: String,
    pub billed: i64,
    pub key: String,
    pub good: i64,
    pub bad: i64,
    pub received: i64,
    pub delta: i64,
    pub finding: Finding,
    pub matched: bool,
    pub billed_total_cents: i64,
    pub charge_total_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub billing_rows: usize,
    pub dropped_rows: usize,
    pub triage_rows: usize,
    pub triage_keys: usize,
    pub unmatched: usize,
    pub finding_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub billing_table: String,
    pub triage_table: String,
    pub unit_price_cents: i64,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<ReconciledRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_normalizes_column_names() {
        let t = Table::new(
            "Devolução",
            vec!["  nf ".into(), "Qtde Física (Bom)".into()],
            vec![],
        );
        assert_eq!(t.columns, vec!["NF", "QTDE FÍSICA (BOM)"]);
        assert_eq!(t.column_index("NF"), Some(0));
        assert_eq!(t.column_index("QTDE FÍSICA (BOM)"), Some(1));
        assert_eq!(t.column_index("nf"), None);
    }

    #[test]
    fn cell_is_total_over_ragged_rows() {
        let t = Table::new(
            "t",
            vec!["A".into(), "B".into()],
            vec![vec!["x".into()]],
        );
        assert_eq!(t.cell(0, 0), "x");
        assert_eq!(t.cell(0, 1), "");
        assert_eq!(t.cell(5, 0), "");
    }

    #[test]
    fn parse_quantity_accepts_integers_and_decimal_comma() {
        assert_eq!(parse_quantity("12"), 12);
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity("12,0"), 12);
        assert_eq!(parse_quantity("12.6"), 13);
        assert_eq!(parse_quantity("-3"), -3);
    }

    #[test]
    fn parse_quantity_reads_junk_as_zero() {
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("   "), 0);
        assert_eq!(parse_quantity("n/a"), 0);
        assert_eq!(parse_quantity("12 caixas"), 0);
    }

    #[test]
    fn finding_serializes_as_report_label() {
        let json = serde_json::to_string(&Finding::EntryError).unwrap();
        assert_eq!(json, "\"Digitou errado\"");
        assert_eq!(Finding::Correct.to_string(), "Correto");
    }
}
