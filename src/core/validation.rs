//! Required-column checks for the three source tables
//!
//! These checks are the only gate against malformed input. The validated
//! views in [`crate::core::models::sources`] run them on construction, and the
//! metric functions only accept those views.

use super::config::ColumnConfig;
use super::errors::{MetricsError, Result, TableKind};
use super::models::Table;

/// Fail with every column in `required` that `table` lacks
///
/// # Errors
/// Returns `MissingColumns` naming all absent columns, in `required` order.
pub fn require_columns(table: &Table, kind: TableKind, required: &[&str]) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();
    for name in required {
        if !table.has_column(name) && !missing.iter().any(|m| m == name) {
            missing.push((*name).to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        crate::debug!("{kind} table missing columns: {missing:?}");
        Err(MetricsError::MissingColumns {
            table: kind,
            columns: missing,
        })
    }
}

/// Columns the aid table must carry
#[must_use]
pub fn aid_columns(columns: &ColumnConfig) -> [&str; 2] {
    [columns.id.as_str(), columns.aid_year.as_str()]
}

/// Columns the cohort/retention table must carry
#[must_use]
pub fn cohort_columns(columns: &ColumnConfig) -> [&str; 4] {
    [
        columns.id.as_str(),
        columns.cohort_name.as_str(),
        columns.years_to_graduation.as_str(),
        columns.second_fall_period.as_str(),
    ]
}

/// Columns the enrollment table must carry
#[must_use]
pub fn enrollment_columns(columns: &ColumnConfig) -> [&str; 5] {
    [
        columns.id.as_str(),
        columns.academic_period.as_str(),
        columns.time_status.as_str(),
        columns.student_level.as_str(),
        columns.degree.as_str(),
    ]
}

/// Check the aid table's identifier and aid-year columns
///
/// # Errors
/// Returns `MissingColumns` if any are absent.
pub fn validate_aid_columns(table: &Table, columns: &ColumnConfig) -> Result<()> {
    require_columns(table, TableKind::Aid, &aid_columns(columns))
}

/// Check the cohort table's identifier, cohort-name, graduation and
/// second-fall columns
///
/// # Errors
/// Returns `MissingColumns` if any are absent.
pub fn validate_cohort_columns(table: &Table, columns: &ColumnConfig) -> Result<()> {
    require_columns(table, TableKind::Cohort, &cohort_columns(columns))
}

/// Check the enrollment table's identifier, term, status, level and degree
/// columns
///
/// # Errors
/// Returns `MissingColumns` if any are absent.
pub fn validate_enrollment_columns(table: &Table, columns: &ColumnConfig) -> Result<()> {
    require_columns(table, TableKind::Enrollment, &enrollment_columns(columns))
}
