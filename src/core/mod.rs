//! Core module: term arithmetic, source tables, metrics and report assembly

pub mod config;
pub mod errors;
pub mod extracts;
pub mod io;
pub mod metrics;
pub mod models;
pub mod report;
pub mod term;
pub mod validation;

pub use errors::{MetricsError, Result};

/// Returns the current version of the `IrMetrics` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
