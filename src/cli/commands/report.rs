//! Report command handler
//!
//! Loads the three source tables, computes every report metric for a fall
//! term and writes the one-row result file.

use ir_metrics::config::Config;
use ir_metrics::core::io::{output_results, read_table, FileDecoration};
use ir_metrics::core::models::Table;
use ir_metrics::core::report::{build_report, ReportSources};
use ir_metrics::core::term::Term;
use ir_metrics::{error, get_version, info, verbose};
use std::path::{Path, PathBuf};

/// Source table paths for one report run
#[derive(Debug)]
pub struct ReportInputs<'a> {
    /// Aid award table
    pub aid: &'a Path,
    /// Retention and graduation table
    pub cohort: &'a Path,
    /// Census enrollment table
    pub enrollment: &'a Path,
}

/// Result file naming switches from the command line
#[derive(Debug, Clone, Copy)]
pub struct NamingFlags {
    /// `--no-date` was given
    pub no_date: bool,
    /// `--no-version` was given
    pub no_version: bool,
}

/// Run the report command.
///
/// Exits with status 1 when any step fails.
pub fn run(
    inputs: &ReportInputs<'_>,
    term: &str,
    output: Option<&Path>,
    flags: NamingFlags,
    config: &Config,
) {
    match generate(inputs, term, output, flags, config) {
        Ok(path) => println!("✓ Report written: {}", path.display()),
        Err(err) => {
            error!("Report for term {term} failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn load(path: &Path, role: &str) -> Result<Table, String> {
    let table = read_table(path).map_err(|e| format!("✗ Failed to load {role} table: {e}"))?;
    info!("{role} table loaded: {} ({} rows)", path.display(), table.len());
    Ok(table)
}

/// Result path: the explicit output, or `results_file` inside `out_dir`
fn results_path(output: Option<&Path>, config: &Config) -> PathBuf {
    output.map_or_else(
        || Path::new(&config.paths.out_dir).join(&config.output.results_file),
        Path::to_path_buf,
    )
}

fn decoration(flags: NamingFlags, config: &Config) -> FileDecoration {
    FileDecoration {
        append_date: config.output.append_date && !flags.no_date,
        version: (config.output.append_version && !flags.no_version)
            .then(|| get_version().to_string()),
    }
}

fn generate(
    inputs: &ReportInputs<'_>,
    term: &str,
    output: Option<&Path>,
    flags: NamingFlags,
    config: &Config,
) -> Result<PathBuf, String> {
    let term: Term = term.parse().map_err(|e| format!("✗ {e}"))?;

    let aid = load(inputs.aid, "aid")?;
    let cohort = load(inputs.cohort, "cohort")?;
    let enrollment = load(inputs.enrollment, "enrollment")?;

    let sources = ReportSources::new(&aid, &cohort, &enrollment, &config.columns)
        .map_err(|e| format!("✗ {e}"))?;
    let row = build_report(&sources, &term, &config.report)
        .map_err(|e| format!("✗ Failed to compute metrics for {term}: {e}"))?;

    for name in row.columns() {
        if let Some(value) = row.get(name) {
            verbose!("  {name}: {value}");
        }
    }

    let path = results_path(output, config);
    output_results(&row.to_table(), &path, &decoration(flags, config))
        .map_err(|e| format!("✗ Failed to write results to {}: {e}", path.display()))
}
