//! `restitch-recon` — Billing vs. physical-count reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns classified rows.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod model;

pub use config::ReconcileConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{Finding, ReconReport, ReconciledRow, Table};
