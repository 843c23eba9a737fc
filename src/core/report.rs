//! One-row result record for a report term
//!
//! The column names embed the fall year each value describes. They are read
//! by downstream spreadsheets, so renaming a column is a breaking change.

use super::config::{ColumnConfig, ReportConfig};
use super::errors::{MetricsError, Result};
use super::metrics::{
    cohort_grad_rate, cohort_pell_count, cohort_pell_grad_rate, cohort_size, fall_enrollment,
    headcount, rate, second_year_retention_rate, second_year_retention_rate_pell,
};
use super::models::{AidTable, CohortTable, EnrollmentTable, Table};
use super::term::{adjust_term, Season, Term};
use std::fmt;

/// A single value in the result record
#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    /// A headcount or cohort size
    Count(i64),
    /// A rate or share rounded to three decimals
    Rate(f64),
    /// Free text such as the report term
    Text(String),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Rate(r) => write!(f, "{r}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<usize> for ReportValue {
    fn from(n: usize) -> Self {
        Self::Count(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

/// Ordered named values making up one result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    values: Vec<(String, ReportValue)>,
}

impl ReportRow {
    /// Empty row
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a named value
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ReportValue>) {
        self.values.push((name.into(), value.into()));
    }

    /// Value stored under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReportValue> {
        self.values
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One-row table with the values rendered as text
    #[must_use]
    pub fn to_table(&self) -> Table {
        let headers = self.values.iter().map(|(n, _)| n.clone()).collect();
        let row = self.values.iter().map(|(_, v)| v.to_string()).collect();
        Table::from_rows(headers, vec![row])
    }
}

/// The three validated source tables a report reads
#[derive(Debug, Clone, Copy)]
pub struct ReportSources<'a> {
    /// Aid awards
    pub aid: AidTable<'a>,
    /// Cohort / retention records
    pub cohort: CohortTable<'a>,
    /// Census enrollment
    pub enrollment: EnrollmentTable<'a>,
}

impl<'a> ReportSources<'a> {
    /// Validate all three tables against `columns`
    ///
    /// # Errors
    /// Returns the first table's `MissingColumns` error.
    pub fn new(
        aid: &'a Table,
        cohort: &'a Table,
        enrollment: &'a Table,
        columns: &ColumnConfig,
    ) -> Result<Self> {
        Ok(Self {
            aid: AidTable::new(aid, columns)?,
            cohort: CohortTable::new(cohort, columns)?,
            enrollment: EnrollmentTable::new(enrollment, columns)?,
        })
    }
}

fn share(name: &str, term: &Term, part: i64, whole: i64, whole_name: &str) -> Result<f64> {
    let count = |metric: &str, value: i64| {
        usize::try_from(value).map_err(|_| MetricsError::NegativeCount {
            rate: name.to_string(),
            term: term.to_string(),
            metric: metric.to_string(),
            value,
        })
    };
    let whole = count(whole_name, whole)?;
    let part = count(name, part)?;
    rate(name, term, None, part, whole_name, whole)
}

/// Compute every report metric for the fall term `term`
///
/// # Errors
/// Returns `InvalidTerm` for a non-fall term or a look-back that leaves the
/// four-digit year range, `UndefinedRate` for the first rate whose
/// denominator is empty, and `NegativeCount` when non-transfer enrollment
/// comes out below zero.
pub fn build_report(
    sources: &ReportSources<'_>,
    term: &Term,
    options: &ReportConfig,
) -> Result<ReportRow> {
    if term.season() != Season::Fall {
        return Err(MetricsError::invalid_term(
            term.to_string(),
            "reports are built for fall terms",
        ));
    }
    let ReportSources {
        aid,
        cohort,
        enrollment,
    } = sources;
    let year = term.calendar_year();
    let mut row = ReportRow::new();
    row.push("Report Term", ReportValue::Text(term.to_string()));
    row.push(format!("Fall {year} Headcount"), headcount(enrollment, term));

    for (label, transfer) in [("Non-Transfer", false), ("Transfer", true)] {
        let all = fall_enrollment(aid, cohort, enrollment, term, false, transfer);
        let pell = fall_enrollment(aid, cohort, enrollment, term, true, transfer);
        let pct = share(
            &format!("pell_share_{}", label.to_lowercase()),
            term,
            pell,
            all,
            "fall_enrollment",
        )?;
        row.push(format!("Fall {year} Enrollment ({label})"), ReportValue::Count(all));
        row.push(format!("Fall {year} Pell Enrollment ({label})"), ReportValue::Count(pell));
        row.push(format!("Fall {year} Pell % ({label})"), ReportValue::Rate(pct));
    }

    let size = cohort_size(cohort, term);
    let pell_cohort = cohort_pell_count(aid, cohort, term);
    row.push(format!("Fall {year} Cohort Size"), size);
    row.push(format!("Fall {year} Pell Cohort"), pell_cohort);
    row.push(
        format!("Fall {year} Pell % of Cohort"),
        ReportValue::Rate(rate(
            "pell_share_cohort",
            term,
            None,
            pell_cohort,
            "cohort_size",
            size,
        )?),
    );

    let retention = adjust_term(term, -1)?;
    let retention_year = retention.calendar_year();
    row.push(
        format!("Fall {retention_year} Cohort 2nd-Year Retention Rate"),
        ReportValue::Rate(second_year_retention_rate(cohort, &retention)?),
    );
    row.push(
        format!("Fall {retention_year} Pell Cohort 2nd-Year Retention Rate"),
        ReportValue::Rate(second_year_retention_rate_pell(aid, cohort, &retention)?),
    );

    let mut horizons: Vec<u32> = Vec::with_capacity(options.grad_years.len());
    for &n in &options.grad_years {
        if horizons.contains(&n) {
            crate::debug!("skipping repeated graduation horizon {n}");
            continue;
        }
        horizons.push(n);
        let shift = i32::try_from(n)
            .map_err(|_| MetricsError::invalid_term(term.to_string(), format!("cannot look back {n} years")))?;
        let grad = adjust_term(term, -shift)?;
        let grad_year = grad.calendar_year();
        row.push(format!("Fall {grad_year} Cohort Size"), cohort_size(cohort, &grad));
        row.push(
            format!("Fall {grad_year} Pell Cohort"),
            cohort_pell_count(aid, cohort, &grad),
        );
        row.push(
            format!("Fall {grad_year} Cohort {n}-Year Grad Rate"),
            ReportValue::Rate(cohort_grad_rate(cohort, &grad, n)?),
        );
        row.push(
            format!("Fall {grad_year} Pell Cohort {n}-Year Grad Rate"),
            ReportValue::Rate(cohort_pell_grad_rate(aid, cohort, &grad, n)?),
        );
    }

    crate::info!("built report for {term}: {} column(s)", row.len());
    Ok(row)
}
