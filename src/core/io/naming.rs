//! Result file names
//!
//! Result files are decorated as `stem[_YYYY-MM-DD][_vX-Y-Z].ext` so repeated
//! runs never overwrite each other and every file records the tool version
//! that produced it.

use super::{write_table, TableFormat};
use crate::core::errors::{MetricsError, Result};
use crate::core::models::Table;
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffixes appended to a result file's stem
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDecoration {
    /// Append the run date as `_YYYY-MM-DD`
    pub append_date: bool,
    /// Append `_v` and this version with dots replaced by dashes
    pub version: Option<String>,
}

impl FileDecoration {
    /// Decoration with both the date and `version`
    #[must_use]
    pub fn dated(version: impl Into<String>) -> Self {
        Self {
            append_date: true,
            version: Some(version.into()),
        }
    }

    /// Decoration that leaves the file name untouched
    #[must_use]
    pub const fn none() -> Self {
        Self {
            append_date: false,
            version: None,
        }
    }
}

/// Version tag used in file names (`1.2.3` becomes `v1-2-3`)
#[must_use]
pub fn version_tag(version: &str) -> String {
    format!("v{}", version.replace('.', "-"))
}

/// Decorate `file` per `decoration`, keeping its directory and extension
///
/// # Errors
/// Returns `InvalidFilename` if `file` has no stem, or `UnsupportedFormat`
/// if its extension is not a table format.
pub fn results_filename(
    file: &Path,
    decoration: &FileDecoration,
    today: NaiveDate,
) -> Result<PathBuf> {
    let format = TableFormat::from_path(file)?;
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && !s.starts_with('.'))
        .ok_or_else(|| MetricsError::InvalidFilename {
            path: file.to_path_buf(),
            reason: "file name has no stem".to_string(),
        })?;

    let mut name = stem.to_string();
    if decoration.append_date {
        name.push('_');
        name.push_str(&today.format("%Y-%m-%d").to_string());
    }
    if let Some(version) = &decoration.version {
        name.push('_');
        name.push_str(&version_tag(version));
    }

    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_else(|| format.extension());
    Ok(file.with_file_name(format!("{name}.{extension}")))
}

/// Write `table` to the decorated form of `file`, creating its directory
///
/// Returns the path actually written.
///
/// # Errors
/// Returns the naming error, a directory creation error, or the write error.
pub fn output_results(table: &Table, file: &Path, decoration: &FileDecoration) -> Result<PathBuf> {
    let path = results_filename(file, decoration, Local::now().date_naive())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_table(table, &path)?;
    crate::info!("wrote {} row(s) to {}", table.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
    }

    #[test]
    fn decorates_with_date_and_version() {
        let path = results_filename(
            Path::new("out/results.xlsx"),
            &FileDecoration::dated("0.3.1"),
            day(),
        )
        .unwrap();
        assert_eq!(path, Path::new("out/results_2025-10-15_v0-3-1.xlsx"));
    }

    #[test]
    fn decoration_parts_are_optional() {
        let only_version = FileDecoration {
            append_date: false,
            version: Some("1.0.0".to_string()),
        };
        assert_eq!(
            results_filename(Path::new("r.csv"), &only_version, day()).unwrap(),
            Path::new("r_v1-0-0.csv")
        );
        assert_eq!(
            results_filename(Path::new("r.txt"), &FileDecoration::none(), day()).unwrap(),
            Path::new("r.txt")
        );
    }

    #[test]
    fn rejects_unusable_names() {
        assert!(matches!(
            results_filename(Path::new("r.json"), &FileDecoration::none(), day()),
            Err(MetricsError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            results_filename(Path::new("out/.csv"), &FileDecoration::none(), day()),
            Err(MetricsError::UnsupportedFormat { .. } | MetricsError::InvalidFilename { .. })
        ));
    }
}
