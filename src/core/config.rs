//! Configuration module for `IrMetrics`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the config directory in path-like values
const DIR_VARIABLE: &str = "$IR_METRICS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for report result files
    #[serde(default)]
    pub out_dir: String,
    /// Directory for annotation extracts
    #[serde(default)]
    pub extracts_dir: String,
}

/// Result file naming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default result file name (its extension picks the format)
    #[serde(default)]
    pub results_file: String,
    /// Append today's date (`YYYY-MM-DD`) to result file names
    #[serde(default = "default_true")]
    pub append_date: bool,
    /// Append the package version tag (`vX-Y-Z`) to result file names
    #[serde(default = "default_true")]
    pub append_version: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_file: String::new(),
            append_date: true,
            append_version: true,
        }
    }
}

/// Column names for every role the metrics read.
///
/// Each field defaults to the literal used by the upstream extracts, so a
/// config file only needs the names a site has renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Student identifier, shared by all three tables
    pub id: String,
    /// Aid table: aid year of the award
    pub aid_year: String,
    /// Cohort table: constructed cohort label
    pub cohort_name: String,
    /// Cohort table: years taken to graduate (numeric text, may be blank)
    pub years_to_graduation: String,
    /// Cohort table: term at which second-fall retention was observed
    pub second_fall_period: String,
    /// Enrollment table: census term code
    pub academic_period: String,
    /// Enrollment table: full-/part-time status
    pub time_status: String,
    /// Enrollment table: student level
    pub student_level: String,
    /// Enrollment table: degree sought
    pub degree: String,
    /// Enrollment and cohort tables: person identifier carried into extracts
    pub person_uid: String,
    /// Cohort table: fiscal year of the cohort
    pub cohort_fiscal_year: String,
    /// Cohort table: cohort code carried into extracts
    pub cohort: String,
    /// Cohort table: term the cohort was assigned in
    pub cohort_academic_period: String,
    /// Aid-year values are two-digit labels (`25`) instead of four-digit (`2025`)
    pub two_digit_aid_year: bool,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            aid_year: "AID_YEAR".to_string(),
            cohort_name: "Cohort Name".to_string(),
            years_to_graduation: "Years to Graduation".to_string(),
            second_fall_period: "Academic Period 2nd Fall".to_string(),
            academic_period: "Academic Period".to_string(),
            time_status: "Time Status".to_string(),
            student_level: "Student Level".to_string(),
            degree: "Degree".to_string(),
            person_uid: "Person Uid".to_string(),
            cohort_fiscal_year: "Cohort Fiscal Year".to_string(),
            cohort: "Cohort".to_string(),
            cohort_academic_period: "Cohort Academic Period".to_string(),
            two_digit_aid_year: false,
        }
    }
}

impl ColumnConfig {
    /// Mutable access to a column name by its config key
    fn name_mut(&mut self, key: &str) -> Option<&mut String> {
        let field = match key {
            "id_column" => &mut self.id,
            "aid_year_column" => &mut self.aid_year,
            "cohort_name_column" => &mut self.cohort_name,
            "years_to_graduation_column" => &mut self.years_to_graduation,
            "second_fall_column" => &mut self.second_fall_period,
            "academic_period_column" => &mut self.academic_period,
            "time_status_column" => &mut self.time_status,
            "student_level_column" => &mut self.student_level,
            "degree_column" => &mut self.degree,
            "person_uid_column" => &mut self.person_uid,
            "cohort_fiscal_year_column" => &mut self.cohort_fiscal_year,
            "cohort_column" => &mut self.cohort,
            "cohort_period_column" => &mut self.cohort_academic_period,
            _ => return None,
        };
        Some(field)
    }

    /// Column name by its config key
    fn name(&self, key: &str) -> Option<&str> {
        let field = match key {
            "id_column" => &self.id,
            "aid_year_column" => &self.aid_year,
            "cohort_name_column" => &self.cohort_name,
            "years_to_graduation_column" => &self.years_to_graduation,
            "second_fall_column" => &self.second_fall_period,
            "academic_period_column" => &self.academic_period,
            "time_status_column" => &self.time_status,
            "student_level_column" => &self.student_level,
            "degree_column" => &self.degree,
            "person_uid_column" => &self.person_uid,
            "cohort_fiscal_year_column" => &self.cohort_fiscal_year,
            "cohort_column" => &self.cohort,
            "cohort_period_column" => &self.cohort_academic_period,
            _ => return None,
        };
        Some(field)
    }

    /// Config keys for every column name, in display order
    pub const KEYS: [&'static str; 13] = [
        "id_column",
        "aid_year_column",
        "cohort_name_column",
        "years_to_graduation_column",
        "second_fall_column",
        "academic_period_column",
        "time_status_column",
        "student_level_column",
        "degree_column",
        "person_uid_column",
        "cohort_fiscal_year_column",
        "cohort_column",
        "cohort_period_column",
    ];
}

/// Report assembly settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Graduation horizons in years; each adds a block of cohort columns
    #[serde(default = "default_grad_years")]
    pub grad_years: Vec<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            grad_years: default_grad_years(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_grad_years() -> Vec<u32> {
    vec![4, 6]
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Result file naming
    #[serde(default)]
    pub output: OutputConfig,
    /// Source column names
    #[serde(default)]
    pub columns: ColumnConfig,
    /// Report assembly settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override results output directory
    pub out_dir: Option<String>,
    /// Override extracts output directory
    pub extracts_dir: Option<String>,
    /// Override the student identifier column
    pub id_column: Option<String>,
    /// Override the aid-year column
    pub aid_year_column: Option<String>,
    /// Override the cohort-name column
    pub cohort_name_column: Option<String>,
}

impl Config {
    /// Get the `$IR_METRICS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/irmetrics`
    /// - macOS: `~/Library/Application Support/irmetrics`
    /// - Windows: `%APPDATA%\irmetrics`
    #[must_use]
    pub fn get_irmetrics_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("irmetrics")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading a config written by an older release: fields that are
    /// empty here and non-empty in `defaults` are filled in.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.out_dir.is_empty() && !defaults.paths.out_dir.is_empty() {
            self.paths.out_dir.clone_from(&defaults.paths.out_dir);
            changed = true;
        }
        if self.paths.extracts_dir.is_empty() && !defaults.paths.extracts_dir.is_empty() {
            self.paths
                .extracts_dir
                .clone_from(&defaults.paths.extracts_dir);
            changed = true;
        }

        if self.output.results_file.is_empty() && !defaults.output.results_file.is_empty() {
            self.output
                .results_file
                .clone_from(&defaults.output.results_file);
            changed = true;
        }

        // A blank column name can never match a header
        for key in ColumnConfig::KEYS {
            let fallback = defaults.columns.name(key).unwrap_or_default().to_string();
            if let Some(name) = self.columns.name_mut(key) {
                if name.is_empty() && !fallback.is_empty() {
                    *name = fallback;
                    changed = true;
                }
            }
        }

        if self.report.grad_years.is_empty() && !defaults.report.grad_years.is_empty() {
            self.report
                .grad_years
                .clone_from(&defaults.report.grad_years);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values, and nothing is persisted.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
        if let Some(extracts_dir) = &overrides.extracts_dir {
            self.paths.extracts_dir.clone_from(extracts_dir);
        }

        if let Some(id) = &overrides.id_column {
            self.columns.id.clone_from(id);
        }
        if let Some(aid_year) = &overrides.aid_year_column {
            self.columns.aid_year.clone_from(aid_year);
        }
        if let Some(cohort_name) = &overrides.cohort_name_column {
            self.columns.cohort_name.clone_from(cohort_name);
        }
    }

    /// Get the user config file path
    ///
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_irmetrics_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$IR_METRICS` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_irmetrics_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults; `$IR_METRICS` is expanded in
    /// path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);
        config.paths.extracts_dir = Self::expand_variables(&config.paths.extracts_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from defaults, save if changed
    /// - On first run: create the config directory and write the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `out_dir`, `extracts_dir`,
    /// `results_file`, `append_date`, `append_version`, `two_digit_aid_year`,
    /// `grad_years`, and every `*_column` key in [`ColumnConfig::KEYS`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "out_dir" | "out-dir" => Some(self.paths.out_dir.clone()),
            "extracts_dir" | "extracts-dir" => Some(self.paths.extracts_dir.clone()),
            "results_file" => Some(self.output.results_file.clone()),
            "append_date" => Some(self.output.append_date.to_string()),
            "append_version" => Some(self.output.append_version.to_string()),
            "two_digit_aid_year" => Some(self.columns.two_digit_aid_year.to_string()),
            "grad_years" => Some(format_grad_years(&self.report.grad_years)),
            _ => self.columns.name(key).map(str::to_string),
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "out_dir" | "out-dir" => self.paths.out_dir = value.to_string(),
            "extracts_dir" | "extracts-dir" => self.paths.extracts_dir = value.to_string(),
            "results_file" => self.output.results_file = value.to_string(),
            "append_date" => self.output.append_date = parse_bool(key, value)?,
            "append_version" => self.output.append_version = parse_bool(key, value)?,
            "two_digit_aid_year" => self.columns.two_digit_aid_year = parse_bool(key, value)?,
            "grad_years" => self.report.grad_years = parse_grad_years(value)?,
            _ => {
                let name = self
                    .columns
                    .name_mut(key)
                    .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
                if value.trim().is_empty() {
                    return Err(format!("Column name for '{key}' cannot be empty"));
                }
                *name = value.to_string();
            }
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "out_dir" | "out-dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            "extracts_dir" | "extracts-dir" => self
                .paths
                .extracts_dir
                .clone_from(&defaults.paths.extracts_dir),
            "results_file" => self
                .output
                .results_file
                .clone_from(&defaults.output.results_file),
            "append_date" => self.output.append_date = defaults.output.append_date,
            "append_version" => self.output.append_version = defaults.output.append_version,
            "two_digit_aid_year" => {
                self.columns.two_digit_aid_year = defaults.columns.two_digit_aid_year;
            }
            "grad_years" => self
                .report
                .grad_years
                .clone_from(&defaults.report.grad_years),
            _ => {
                let fallback = defaults
                    .columns
                    .name(key)
                    .ok_or_else(|| format!("Unknown config key: '{key}'"))?
                    .to_string();
                if let Some(name) = self.columns.name_mut(key) {
                    *name = fallback;
                }
            }
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

fn parse_grad_years(value: &str) -> Result<Vec<u32>, String> {
    let years = value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("Invalid graduation horizon '{v}' in 'grad_years'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if years.is_empty() {
        return Err("'grad_years' needs at least one horizon, e.g. \"4,6\"".to_string());
    }
    if let Some((i, n)) = years.iter().enumerate().find(|(i, n)| years[..*i].contains(*n)) {
        return Err(format!(
            "Graduation horizon {n} is listed twice in 'grad_years' (position {})",
            i + 1
        ));
    }
    Ok(years)
}

fn format_grad_years(years: &[u32]) -> String {
    years
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;
        writeln!(f, "  extracts_dir = \"{}\"", self.paths.extracts_dir)?;

        writeln!(f, "\n[output]")?;
        writeln!(f, "  results_file = \"{}\"", self.output.results_file)?;
        writeln!(f, "  append_date = {}", self.output.append_date)?;
        writeln!(f, "  append_version = {}", self.output.append_version)?;

        writeln!(f, "\n[columns]")?;
        for key in ColumnConfig::KEYS {
            writeln!(
                f,
                "  {key} = \"{}\"",
                self.columns.name(key).unwrap_or_default()
            )?;
        }
        writeln!(
            f,
            "  two_digit_aid_year = {}",
            self.columns.two_digit_aid_year
        )?;

        writeln!(f, "\n[report]")?;
        writeln!(
            f,
            "  grad_years = \"{}\"",
            format_grad_years(&self.report.grad_years)
        )?;

        Ok(())
    }
}
