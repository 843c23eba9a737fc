//! Extract command handler
//!
//! Writes the id-list workbooks that staff annotate with Pell flags.

use crate::args::ExtractSubcommand;
use ir_metrics::config::Config;
use ir_metrics::core::extracts::{
    cohort_extract_filename, cohort_year_extract, enrolled_extract_filename,
    enrolled_students_extract, save_extract,
};
use ir_metrics::core::io::read_table;
use ir_metrics::core::models::EnrollmentTable;
use ir_metrics::core::term::{AcademicYear, Term};
use ir_metrics::{error, info};
use std::path::{Path, PathBuf};

/// Dispatch extract subcommands. Exits with status 1 on failure.
pub fn run(subcommand: ExtractSubcommand, config: &Config) {
    let result = match subcommand {
        ExtractSubcommand::Enrolled {
            enrollment,
            term,
            out_dir,
        } => enrolled(&enrollment, &term, &target_dir(out_dir, config), config),
        ExtractSubcommand::Cohorts {
            cohort,
            academic_year,
            out_dir,
        } => cohorts(&cohort, &academic_year, &target_dir(out_dir, config), config),
    };

    match result {
        Ok(path) => println!("✓ Extract written: {}", path.display()),
        Err(err) => {
            error!("Extract failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn target_dir(out_dir: Option<PathBuf>, config: &Config) -> PathBuf {
    out_dir.unwrap_or_else(|| PathBuf::from(&config.paths.extracts_dir))
}

fn enrolled(path: &Path, term: &str, out_dir: &Path, config: &Config) -> Result<PathBuf, String> {
    let term: Term = term.parse().map_err(|e| format!("✗ {e}"))?;
    let table = read_table(path).map_err(|e| format!("✗ Failed to load enrollment table: {e}"))?;
    info!("Enrollment table loaded: {} ({} rows)", path.display(), table.len());

    let enrollment =
        EnrollmentTable::new(&table, &config.columns).map_err(|e| format!("✗ {e}"))?;
    let extract = enrolled_students_extract(&enrollment, &config.columns, &term)
        .map_err(|e| format!("✗ {e}"))?;
    save_extract(&extract, out_dir, &enrolled_extract_filename(&term))
        .map_err(|e| format!("✗ Failed to write extract: {e}"))
}

fn cohorts(
    path: &Path,
    academic_year: &str,
    out_dir: &Path,
    config: &Config,
) -> Result<PathBuf, String> {
    let year: AcademicYear = academic_year.parse().map_err(|e| format!("✗ {e}"))?;
    let table = read_table(path).map_err(|e| format!("✗ Failed to load cohort table: {e}"))?;
    info!("Cohort table loaded: {} ({} rows)", path.display(), table.len());

    let extract =
        cohort_year_extract(&table, &config.columns, &year).map_err(|e| format!("✗ {e}"))?;
    save_extract(&extract, out_dir, &cohort_extract_filename(&year))
        .map_err(|e| format!("✗ Failed to write extract: {e}"))
}
