use std::fmt;

/// Failures while cleaning one export file. Both are per-file: a batch run
/// reports them and moves on to the next upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    /// The decoded input had no non-empty lines.
    EmptyInput,
    /// Only a header line was present; reconstruction produced nothing.
    NoRecords,
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "file has no non-empty lines"),
            Self::NoRecords => write!(f, "reconstruction produced no records"),
        }
    }
}

impl std::error::Error for CleanError {}
