//! CLI command handlers for `IrMetrics`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod config;
pub mod extract;
pub mod report;
pub mod term;
