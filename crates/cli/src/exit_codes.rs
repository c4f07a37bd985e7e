//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args, invalid config)               |
//! | 3    | I/O error (input unreadable, artifact unwritable)        |
//! | 4    | Schema error (sheet not found, required columns missing) |
//! | 5    | Empty input (no content lines, or no records rebuilt)    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or an invalid config file.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - an input could not be read, or an artifact could not
/// be created or written.
pub const EXIT_IO: u8 = 3;

/// Schema error - no sheet matched the requested keywords, or a table
/// is missing required columns.
pub const EXIT_SCHEMA: u8 = 4;

/// Empty input - a file decoded to no content lines, or record
/// reconstruction produced nothing to write.
pub const EXIT_EMPTY: u8 = 5;

/// Map a per-file `clean` status to its exit code.
///
/// A batch exits with the worst status across its files, where I/O
/// failures outrank empty inputs regardless of numeric order.
pub fn clean_status_exit_code(status: &str) -> u8 {
    match status {
        "ok" => EXIT_SUCCESS,
        "read_error" | "write_error" => EXIT_IO,
        "empty_input" | "no_records" => EXIT_EMPTY,
        _ => EXIT_ERROR,
    }
}
