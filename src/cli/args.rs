//! CLI argument definitions for `IrMetrics`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ir_metrics::config::ConfigOverrides;
use ir_metrics::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `out_dir`, `id_column`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value (restores its default).
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum ExtractSubcommand {
    /// Full-time, degree-seeking undergraduates enrolled in a term.
    Enrolled {
        /// Census enrollment table (.xlsx, .csv or tab-delimited .txt)
        #[arg(long, value_name = "FILE")]
        enrollment: PathBuf,

        /// Term code, e.g. 202580 for fall 2025
        #[arg(long, value_name = "TERM")]
        term: String,

        /// Directory for the extract (defaults to config `extracts_dir`)
        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Students cohorted into any term of an academic year.
    Cohorts {
        /// Retention and graduation table
        #[arg(long, value_name = "FILE")]
        cohort: PathBuf,

        /// Academic year, e.g. 2025-2026
        #[arg(long = "academic-year", value_name = "YYYY-YYYY")]
        academic_year: String,

        /// Directory for the extract (defaults to config `extracts_dir`)
        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute the Pell, retention and graduation report for a fall term.
    ///
    /// Reads the aid, cohort and enrollment tables and writes a one-row result
    /// file whose name carries today's date and the tool version.
    Report {
        /// Aid award table with student ids and aid years
        #[arg(long, value_name = "FILE")]
        aid: PathBuf,

        /// Retention and graduation table
        #[arg(long, value_name = "FILE")]
        cohort: PathBuf,

        /// Census enrollment table
        #[arg(long, value_name = "FILE")]
        enrollment: PathBuf,

        /// Fall term code, e.g. 202580
        #[arg(long, value_name = "TERM")]
        term: String,

        /// Result file (defaults to config `results_file` inside `out_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Do not append today's date to the result file name
        #[arg(long)]
        no_date: bool,

        /// Do not append the tool version to the result file name
        #[arg(long)]
        no_version: bool,
    },
    /// Write id-list extracts for manual Pell annotation.
    Extract {
        #[command(subcommand)]
        subcommand: ExtractSubcommand,
    },
    /// Show the labels derived from a term code.
    ///
    /// Prints the academic year, aid year and cohort labels, and optionally the
    /// term shifted by a number of years.
    Term {
        /// Term code, e.g. 202580
        #[arg(value_name = "TERM")]
        term: String,

        /// Shift the term by this many academic years (may be negative)
        #[arg(long, value_name = "YEARS", allow_negative_numbers = true)]
        shift: Option<i32>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "irmetrics",
    about = "Institutional-research Pell, retention and graduation metrics",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config results directory
    #[arg(long = "config-out-dir", value_name = "DIR")]
    pub config_out_dir: Option<PathBuf>,

    /// Override config extracts directory
    #[arg(long = "config-extracts-dir", value_name = "DIR")]
    pub config_extracts_dir: Option<PathBuf>,

    /// Override the student identifier column name
    #[arg(long = "id-column", value_name = "NAME")]
    pub id_column: Option<String>,

    /// Override the aid-year column name
    #[arg(long = "aid-year-column", value_name = "NAME")]
    pub aid_year_column: Option<String>,

    /// Override the cohort-name column name
    #[arg(long = "cohort-name-column", value_name = "NAME")]
    pub cohort_name_column: Option<String>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            out_dir: path_string(self.config_out_dir.as_ref()),
            extracts_dir: path_string(self.config_extracts_dir.as_ref()),
            id_column: self.id_column.clone(),
            aid_year_column: self.aid_year_column.clone(),
            cohort_name_column: self.cohort_name_column.clone(),
        }
    }
}
