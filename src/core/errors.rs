//! Error types for metric computation and table I/O
//!
//! Every failure is raised at the point of detection. Nothing in the core
//! retries or returns partial results, so each variant carries enough context
//! (table, column, term, threshold) to diagnose a failed report run.

use std::fmt;
use std::path::PathBuf;

/// The three source tables a report run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Financial-aid award table (one row per student and aid year)
    Aid,
    /// Cohort / retention table (one row per cohort assignment)
    Cohort,
    /// Census-date enrollment table (one row per student per term)
    Enrollment,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aid => write!(f, "aid"),
            Self::Cohort => write!(f, "cohort/retention"),
            Self::Enrollment => write!(f, "enrollment"),
        }
    }
}

/// Errors produced by the metrics core and its file collaborators
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// One or more required columns are absent from a table
    #[error("{table} table is missing required column(s): {}", format_columns(.columns))]
    MissingColumns {
        /// Table that failed validation
        table: TableKind,
        /// Every missing column, in the order they were required
        columns: Vec<String>,
    },

    /// A term code that is not six digits with a known suffix
    #[error("invalid term code '{term}': {reason}")]
    InvalidTerm {
        /// The rejected input
        term: String,
        /// Why it was rejected
        reason: String,
    },

    /// An academic-year label that is not `YYYY-YYYY` with consecutive years
    #[error("invalid academic year '{0}': expected consecutive years such as 2025-2026")]
    InvalidAcademicYear(String),

    /// A rate whose denominator evaluated to zero
    #[error(
        "{rate} is undefined for term {term}{}: denominator '{denominator}' is zero",
        format_threshold(.years_to_grad)
    )]
    UndefinedRate {
        /// Name of the rate being computed
        rate: String,
        /// Cohort or report term the rate was requested for
        term: String,
        /// Graduation horizon, for graduation rates
        years_to_grad: Option<u32>,
        /// Name of the metric that produced the empty denominator
        denominator: String,
    },

    /// A count that came out negative and cannot be used in a rate
    #[error(
        "{rate} is undefined for term {term}: '{metric}' is negative ({value}), \
         the transfer cohort is larger than the enrolled population"
    )]
    NegativeCount {
        /// Name of the rate being computed
        rate: String,
        /// Report term
        term: String,
        /// Name of the metric that went negative
        metric: String,
        /// The negative count
        value: i64,
    },

    /// A file extension outside the supported set
    #[error("unsupported file type '{extension}'. Allowed values: .xlsx, .csv, .txt")]
    UnsupportedFormat {
        /// The offending extension (with leading dot, or empty)
        extension: String,
    },

    /// An input file that does not exist
    #[error("input file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A path that cannot be used as an output file name
    #[error("invalid file name '{}': {reason}", .path.display())]
    InvalidFilename {
        /// The rejected path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// A workbook with no worksheet to read
    #[error("workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    /// Filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Delimited-text read or write failure
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Workbook read failure
    #[error(transparent)]
    XlsxRead(#[from] calamine::Error),

    /// Workbook write failure
    #[error(transparent)]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
}

impl MetricsError {
    /// Build an `InvalidTerm` error
    pub fn invalid_term(term: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTerm {
            term: term.into(),
            reason: reason.into(),
        }
    }

    /// Build an `UndefinedRate` error
    pub fn undefined_rate(
        rate: impl Into<String>,
        term: impl fmt::Display,
        years_to_grad: Option<u32>,
        denominator: impl Into<String>,
    ) -> Self {
        Self::UndefinedRate {
            rate: rate.into(),
            term: term.to_string(),
            years_to_grad,
            denominator: denominator.into(),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, MetricsError>;

fn format_columns(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::ref_option)]
fn format_threshold(years_to_grad: &Option<u32>) -> String {
    years_to_grad.map_or_else(String::new, |n| format!(" (years_to_grad = {n})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_column() {
        let err = MetricsError::MissingColumns {
            table: TableKind::Enrollment,
            columns: vec!["Time Status".to_string(), "Degree".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("enrollment table"));
        assert!(msg.contains("'Time Status', 'Degree'"));
    }

    #[test]
    fn undefined_rate_message_names_rate_term_and_threshold() {
        let err = MetricsError::undefined_rate("cohort_grad_rate", "202180", Some(4), "cohort_size");
        let msg = err.to_string();
        assert!(msg.contains("cohort_grad_rate"));
        assert!(msg.contains("202180"));
        assert!(msg.contains("years_to_grad = 4"));
        assert!(msg.contains("'cohort_size'"));

        let err = MetricsError::undefined_rate("second_year_retention_rate", "202480", None, "cohort_size");
        assert!(!err.to_string().contains("years_to_grad"));
    }
}
