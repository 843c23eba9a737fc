//! Validated views over the three source tables
//!
//! Each view is built from a [`Table`] and the column configuration. Building
//! a view runs that table's required-column check and caches the column
//! positions, so the metric functions that take views never re-check.

use super::table::Table;
use crate::core::config::ColumnConfig;
use crate::core::errors::Result;
use crate::core::term::{academic_year_from_term, Term};
use crate::core::validation::{
    validate_aid_columns, validate_cohort_columns, validate_enrollment_columns,
};
use std::collections::HashSet;

/// Set of non-null student identifiers borrowed from a table
pub type IdSet<'a> = HashSet<&'a str>;

/// Required `Time Status` value for the enrollment population
pub const FULL_TIME: &str = "FT";

/// Required `Student Level` value for the enrollment population
pub const UNDERGRADUATE: &str = "UG";

/// Excluded `Degree` value for the enrollment population
pub const NON_DEGREE: &str = "Non Degree";

fn column(table: &Table, name: &str) -> usize {
    // Validated before any view is built
    table.column_index(name).unwrap_or(usize::MAX)
}

/// Financial-aid award table
#[derive(Debug, Clone, Copy)]
pub struct AidTable<'a> {
    table: &'a Table,
    id: usize,
    aid_year: usize,
    two_digit: bool,
}

impl<'a> AidTable<'a> {
    /// Validate `table` as an aid table
    ///
    /// # Errors
    /// Returns `MissingColumns` if the identifier or aid-year column is absent.
    pub fn new(table: &'a Table, columns: &ColumnConfig) -> Result<Self> {
        validate_aid_columns(table, columns)?;
        Ok(Self {
            table,
            id: column(table, &columns.id),
            aid_year: column(table, &columns.aid_year),
            two_digit: columns.two_digit_aid_year,
        })
    }

    /// Underlying table
    #[must_use]
    pub const fn table(&self) -> &'a Table {
        self.table
    }

    /// Aid-year label this table uses for `term`
    #[must_use]
    pub fn aid_year_for(&self, term: &Term) -> String {
        academic_year_from_term(term, self.two_digit)
    }

    /// Pell recipients: non-null ids with an award in the term's aid year
    #[must_use]
    pub fn recipient_ids(&self, term: &Term) -> IdSet<'a> {
        let aid_year = self.aid_year_for(term);
        let table = self.table;
        (0..table.len())
            .filter(|&row| table.cell(row, self.aid_year) == Some(aid_year.as_str()))
            .filter_map(|row| table.cell(row, self.id))
            .collect()
    }
}

/// Cohort / retention table
#[derive(Debug, Clone, Copy)]
pub struct CohortTable<'a> {
    table: &'a Table,
    id: usize,
    cohort_name: usize,
    years_to_graduation: usize,
    second_fall: usize,
}

impl<'a> CohortTable<'a> {
    /// Validate `table` as a cohort/retention table
    ///
    /// # Errors
    /// Returns `MissingColumns` if any required cohort column is absent.
    pub fn new(table: &'a Table, columns: &ColumnConfig) -> Result<Self> {
        validate_cohort_columns(table, columns)?;
        Ok(Self {
            table,
            id: column(table, &columns.id),
            cohort_name: column(table, &columns.cohort_name),
            years_to_graduation: column(table, &columns.years_to_graduation),
            second_fall: column(table, &columns.second_fall_period),
        })
    }

    /// Underlying table
    #[must_use]
    pub const fn table(&self) -> &'a Table {
        self.table
    }

    /// Row positions whose cohort name equals `label`, null ids included
    pub fn rows_in_cohort<'s>(&'s self, label: &'s str) -> impl Iterator<Item = usize> + 's {
        (0..self.table.len())
            .filter(move |&row| self.table.cell(row, self.cohort_name) == Some(label))
    }

    /// Non-null identifiers of the given rows
    pub fn ids_of(&self, rows: impl IntoIterator<Item = usize>) -> IdSet<'a> {
        let table = self.table;
        let id = self.id;
        rows.into_iter()
            .filter_map(|row| table.cell(row, id))
            .collect()
    }

    /// Non-null identifiers in the cohort named `label`
    #[must_use]
    pub fn ids_in_cohort(&self, label: &str) -> IdSet<'a> {
        self.ids_of(self.rows_in_cohort(label))
    }

    /// Parsed years-to-graduation for a row.
    ///
    /// Blank or non-numeric values are not comparable and yield `None`.
    #[must_use]
    pub fn years_to_graduation(&self, row: usize) -> Option<f64> {
        self.table
            .cell(row, self.years_to_graduation)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| !v.is_nan())
    }

    /// Whether the row graduated within `years_to_grad` years
    #[must_use]
    pub fn graduated_within(&self, row: usize, years_to_grad: u32) -> bool {
        self.years_to_graduation(row)
            .is_some_and(|years| years <= f64::from(years_to_grad))
    }

    /// Whether the row's second-fall period equals `term`
    #[must_use]
    pub fn retained_at(&self, row: usize, term: &Term) -> bool {
        self.table
            .cell(row, self.second_fall)
            .is_some_and(|period| period == term.to_string())
    }
}

/// Census-date enrollment table
#[derive(Debug, Clone, Copy)]
pub struct EnrollmentTable<'a> {
    table: &'a Table,
    id: usize,
    academic_period: usize,
    time_status: usize,
    student_level: usize,
    degree: usize,
}

impl<'a> EnrollmentTable<'a> {
    /// Validate `table` as an enrollment table
    ///
    /// # Errors
    /// Returns `MissingColumns` if any required enrollment column is absent.
    pub fn new(table: &'a Table, columns: &ColumnConfig) -> Result<Self> {
        validate_enrollment_columns(table, columns)?;
        Ok(Self {
            table,
            id: column(table, &columns.id),
            academic_period: column(table, &columns.academic_period),
            time_status: column(table, &columns.time_status),
            student_level: column(table, &columns.student_level),
            degree: column(table, &columns.degree),
        })
    }

    /// Underlying table
    #[must_use]
    pub const fn table(&self) -> &'a Table {
        self.table
    }

    /// Full-time, undergraduate, degree-seeking row in `term`.
    ///
    /// A null degree counts as degree-seeking.
    #[must_use]
    pub fn is_fed(&self, row: usize, term: &str) -> bool {
        self.table.cell(row, self.academic_period) == Some(term)
            && self.table.cell(row, self.time_status) == Some(FULL_TIME)
            && self.table.cell(row, self.student_level) == Some(UNDERGRADUATE)
            && self.table.cell(row, self.degree) != Some(NON_DEGREE)
    }

    /// Row positions passing the enrollment filter for `term`
    #[must_use]
    pub fn fed_rows(&self, term: &Term) -> Vec<usize> {
        let code = term.to_string();
        (0..self.table.len())
            .filter(|&row| self.is_fed(row, &code))
            .collect()
    }

    /// Distinct non-null identifiers passing the enrollment filter for `term`
    #[must_use]
    pub fn fed_ids(&self, term: &Term) -> IdSet<'a> {
        let table = self.table;
        self.fed_rows(term)
            .into_iter()
            .filter_map(|row| table.cell(row, self.id))
            .collect()
    }
}
