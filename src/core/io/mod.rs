//! Reading source tables from disk and writing result tables back out
//!
//! The file extension picks the format: `.csv` is comma-delimited, `.txt` is
//! tab-delimited and `.xlsx` is an Excel workbook. Every cell is read as text.

pub mod delimited;
pub mod naming;
pub mod xlsx;

pub use delimited::DelimitedExporter;
pub use naming::{output_results, results_filename, FileDecoration};
pub use xlsx::{XlsxExporter, REPORT_SHEET};

use super::errors::{MetricsError, Result};
use super::models::Table;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Extensions accepted for reading and writing tables
pub const ALLOWED_EXTENSIONS: [&str; 3] = [".xlsx", ".csv", ".txt"];

/// Trait for writing a table in one on-disk format
pub trait TableExporter {
    /// Write `table` to `output_path`, replacing any existing file
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    fn export(&self, table: &Table, output_path: &Path) -> Result<()>;
}

/// Supported table file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values in a `.txt` file
    Tab,
    /// Excel workbook
    Xlsx,
}

impl TableFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tab => "txt",
            Self::Xlsx => "xlsx",
        }
    }

    /// Format implied by a path's extension
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for any other (or missing) extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse().map_err(|()| MetricsError::UnsupportedFormat {
            extension: if extension.is_empty() {
                String::new()
            } else {
                format!(".{extension}")
            },
        })
    }

    /// Exporter that writes this format
    #[must_use]
    pub fn exporter(self) -> Box<dyn TableExporter> {
        match self {
            Self::Csv => Box::new(DelimitedExporter::new(b',')),
            Self::Tab => Box::new(DelimitedExporter::new(b'\t')),
            Self::Xlsx => Box::new(XlsxExporter),
        }
    }
}

impl FromStr for TableFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Tab),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Tab => write!(f, "tab-delimited text"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Read a table from `path`, choosing the reader by extension
///
/// # Errors
/// Returns `FileNotFound` if `path` does not exist, `UnsupportedFormat` for
/// an unknown extension, or the underlying read error.
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(MetricsError::FileNotFound(path.to_path_buf()));
    }
    let format = TableFormat::from_path(path)?;
    crate::debug!("reading {format} table from {}", path.display());
    let table = match format {
        TableFormat::Csv => delimited::read(path, b',')?,
        TableFormat::Tab => delimited::read(path, b'\t')?,
        TableFormat::Xlsx => xlsx::read(path)?,
    };
    crate::debug!(
        "read {} row(s) x {} column(s) from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Write `table` to `path`, choosing the writer by extension
///
/// # Errors
/// Returns `UnsupportedFormat` for an unknown extension, or the underlying
/// write error.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    crate::debug!("writing {format} table to {}", path.display());
    format.exporter().export(table, path)
}
