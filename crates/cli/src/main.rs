// restitch CLI - rebuild shredded service-desk exports, reconcile billing

mod clean;
mod exit_codes;
mod inspect;
mod reconcile;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use restitch_io::xlsx::ReadTableError;

// Re-export exit codes from registry (single source of truth)
use exit_codes::{EXIT_EMPTY, EXIT_ERROR, EXIT_IO, EXIT_SCHEMA, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "restitch")]
#[command(about = "Rebuild shredded CSV exports and reconcile billing against physical counts")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild records from raw exports and write the cleaned artifacts
    #[command(after_help = "\
Examples:
  restitch clean sql_SAC_LogDevolucao_CQT.csv
  restitch clean exports/*.csv --out-dir cleaned/
  restitch clean export.csv --overflow withhold
  restitch clean export.csv --skip-wide --json")]
    Clean {
        /// Raw export files (CSV shredded by embedded newlines)
        files: Vec<PathBuf>,

        /// Directory for the cleaned artifacts
        #[arg(long, default_value = ".", value_name = "DIR")]
        out_dir: PathBuf,

        /// What to do with cells over the spreadsheet text limit
        #[arg(long, value_enum, default_value_t = OverflowMode::Split)]
        overflow: OverflowMode,

        /// Skip the wide (one column per field) spreadsheet artifact
        #[arg(long)]
        skip_wide: bool,

        /// Print a machine-readable batch report to stdout
        #[arg(long)]
        json: bool,
    },

    /// Join a billing workbook against a physical-count workbook
    #[command(after_help = "\
Examples:
  restitch reconcile cobranca.xlsx triagem.xlsx
  restitch reconcile cobranca.xlsx triagem.xlsx -o analise.xlsx
  restitch reconcile cobranca.xlsx triagem.xlsx --config restitch.toml --json")]
    Reconcile {
        /// Workbook with the billed quantities
        billing: PathBuf,

        /// Workbook with the physical counts (good/bad per pallet)
        triage: PathBuf,

        /// TOML config (unit price, sheet keywords)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output workbook (default: analise_cobranca_triagem.xlsx)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the full report as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Show the sheet, columns and row count a workbook would present
    #[command(after_help = "\
Examples:
  restitch inspect triagem.xlsx
  restitch inspect cobranca.xlsx --keyword devol --keyword cobran
  restitch inspect triagem.xlsx --require PALLET --require 'NOTA FISCAL'")]
    Inspect {
        /// Workbook to inspect
        file: PathBuf,

        /// Sheet-name keyword (repeatable; first match wins, none = first sheet)
        #[arg(long, value_name = "KW")]
        keyword: Vec<String>,

        /// Column that must be present (repeatable; missing columns fail)
        #[arg(long, value_name = "COL")]
        require: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Policy for one-column cells longer than the spreadsheet limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OverflowMode {
    /// Break the cell into numbered __PART_n__ chunks
    Split,
    /// Write no spreadsheet for that file (the CSV still carries everything)
    Withhold,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  restitch-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  restitch-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: restitch <command> [options]");
            eprintln!("       restitch --help for more information");
            Ok(())
        }
        Some(Commands::Clean {
            files,
            out_dir,
            overflow,
            skip_wide,
            json,
        }) => clean::cmd_clean(files, out_dir, overflow, skip_wide, json),
        Some(Commands::Reconcile {
            billing,
            triage,
            config,
            output,
            json,
        }) => reconcile::cmd_reconcile(billing, triage, config, output, json),
        Some(Commands::Inspect {
            file,
            keyword,
            require,
            json,
        }) => inspect::cmd_inspect(file, keyword, require, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self { code: EXIT_SCHEMA, message: msg.into(), hint: None }
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EMPTY, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Map a workbook read failure to the right exit code: unreadable file
/// is I/O, a workbook with no matching sheet is a schema problem.
pub(crate) fn table_error(path: &Path, err: ReadTableError) -> CliError {
    let message = format!("{}: {}", path.display(), err);
    match err {
        ReadTableError::Io(_) => CliError::io(message),
        ReadTableError::SheetNotFound { .. } => CliError::schema(message),
    }
}
