//! `restitch-engine` — Record reconstruction for malformed service-desk exports.
//!
//! Pure engine crate: receives raw bytes, returns rebuilt records and
//! canonical-width rows. No CLI or IO dependencies.
//!
//! The source tool exports one logical record across several physical lines
//! with no structural boundary marker. The pipeline here decodes the bytes,
//! keeps the pre-`;` content of each line, and re-merges lines into records
//! by detecting the fixed start-of-record text.

pub mod columns;
pub mod decode;
pub mod error;
pub mod header;
pub mod pipeline;
pub mod rebuild;
pub mod splitter;

pub use error::CleanError;
pub use pipeline::{clean_export, CleanedExport};
pub use rebuild::rebuild_records;
