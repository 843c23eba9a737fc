//! Shared library for `IrMetrics`
//! Contains the metrics core and the logger used by the CLI

pub mod core;
pub mod logger;

pub use crate::core::*;
