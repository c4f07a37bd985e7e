use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad price, empty keyword list, etc.).
    ConfigValidation(String),
    /// Required columns absent from an input table. Carries everything the
    /// operator needs to fix the sheet.
    MissingColumns {
        table: String,
        missing: Vec<String>,
        found: Vec<String>,
    },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumns { table, missing, found } => {
                write!(
                    f,
                    "table '{table}': missing required column(s) {}; found: {}",
                    missing.join(", "),
                    found.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ReconError {}
