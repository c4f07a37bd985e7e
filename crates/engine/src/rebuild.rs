//! Logical record reconstruction.
//!
//! The export has no one-line-per-record guarantee: a record's text spills
//! over as many physical lines as the source tool felt like writing. The only
//! reliable boundary signal is that every record's content starts with the
//! literal word "Logística" (accents and case vary). Everything between two
//! start lines belongs to the earlier record and is concatenated back with no
//! separator, so no character of input is ever lost or invented.

use regex::Regex;

/// Leading BOM, whitespace and stray quote characters are skipped before the
/// start word is checked. Both the accented and plain spellings occur.
const START_PATTERN: &str = r#"(?i)^[\u{FEFF}\s"'`]*log[íi]stica"#;

fn start_regex() -> Regex {
    Regex::new(START_PATTERN).unwrap()
}

/// True when an extracted field opens a new logical record.
pub fn starts_record(field: &str) -> bool {
    start_regex().is_match(field)
}

/// Scanner state while folding extracted fields into records.
///
/// The buffer is owned by the state and moved through every transition, so
/// there is no shared accumulator to reset or forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildState {
    /// Nothing accumulated yet.
    Idle,
    /// An open record holding everything seen since its start line.
    Accumulating(String),
}

impl RebuildState {
    /// Feed one extracted field, emitting a finished record when a new start
    /// line closes the open buffer.
    fn advance(self, rx: &Regex, field: &str, out: &mut Vec<String>) -> RebuildState {
        if rx.is_match(field) {
            if let RebuildState::Accumulating(buf) = self {
                if !buf.is_empty() {
                    out.push(buf);
                }
            }
            RebuildState::Accumulating(field.to_string())
        } else {
            match self {
                // A file whose first content line is not a start line still
                // opens a record: nothing may be dropped.
                RebuildState::Idle => RebuildState::Accumulating(field.to_string()),
                RebuildState::Accumulating(mut buf) => {
                    buf.push_str(field);
                    RebuildState::Accumulating(buf)
                }
            }
        }
    }

    /// Flush the open buffer at end of input.
    fn finish(self, out: &mut Vec<String>) {
        if let RebuildState::Accumulating(buf) = self {
            if !buf.is_empty() {
                out.push(buf);
            }
        }
    }
}

/// Merge extracted fields into logical records, in order.
///
/// Total character count of the output equals the total character count of
/// the input fields: continuation lines are appended verbatim and a start
/// line both closes the previous record and opens the next.
pub fn rebuild_records<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rx = start_regex();
    let mut records = Vec::new();
    let mut state = RebuildState::Idle;
    for field in fields {
        state = state.advance(&rx, field.as_ref(), &mut records);
    }
    state.finish(&mut records);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_detection_accent_and_case() {
        assert!(starts_record("Logística - devolução"));
        assert!(starts_record("logistica"));
        assert!(starts_record("LOGÍSTICA SP"));
    }

    #[test]
    fn start_detection_skips_bom_quotes_whitespace() {
        assert!(starts_record("\u{feff}Logística"));
        assert!(starts_record("  \"Logística\""));
        assert!(starts_record("`'Logistica"));
        assert!(starts_record("\" `Logística"));
    }

    #[test]
    fn start_detection_rejects_mid_line_mentions() {
        assert!(!starts_record("parecer da Logística"));
        assert!(!starts_record(""));
        assert!(!starts_record("Logist"));
    }

    #[test]
    fn merges_continuations_between_starts() {
        let records = rebuild_records(["Logística", "continuation text", "Logística B"]);
        assert_eq!(records, vec!["Logísticacontinuation text", "Logística B"]);
    }

    #[test]
    fn no_start_marker_yields_one_record() {
        let records = rebuild_records(["alpha", "beta", "gamma"]);
        assert_eq!(records, vec!["alphabetagamma"]);
    }

    #[test]
    fn each_start_line_is_its_own_record() {
        let records = rebuild_records(["Logística A", "Logística B", "Logística C"]);
        assert_eq!(records, vec!["Logística A", "Logística B", "Logística C"]);
    }

    #[test]
    fn leading_continuations_open_first_record() {
        let records = rebuild_records(["orphan line", "Logística A"]);
        assert_eq!(records, vec!["orphan line", "Logística A"]);
    }

    #[test]
    fn empty_fields_vanish_without_breaking_records() {
        let records = rebuild_records(["Logística A", "", "tail", "", "Logística B"]);
        assert_eq!(records, vec!["Logística Atail", "Logística B"]);
    }

    #[test]
    fn empty_input_yields_no_records() {
        let records = rebuild_records(Vec::<String>::new());
        assert!(records.is_empty());
    }

    #[test]
    fn only_empty_fields_yield_no_records() {
        let records = rebuild_records(["", "", ""]);
        assert!(records.is_empty());
    }

    #[test]
    fn characters_are_conserved() {
        let fields = ["Logística A", "x,y,\"z\"", "", "Logística B", "fim"];
        let records = rebuild_records(fields);
        let in_len: usize = fields.iter().map(|f| f.chars().count()).sum();
        let out_len: usize = records.iter().map(|r| r.chars().count()).sum();
        assert_eq!(in_len, out_len);
    }
}
