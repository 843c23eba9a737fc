//! Enrollment, cohort, retention and graduation metrics
//!
//! Every function takes validated table views and a term, reads nothing
//! else, and returns a fresh value. Identifier comparisons are set
//! intersections over non-null ids.
//!
//! Rates divide by a count from another metric in this module (grad rates by
//! the cohort size, Pell rates by the Pell cohort count). An empty
//! denominator is reported as [`MetricsError::UndefinedRate`], never as a NaN.

use super::errors::{MetricsError, Result};
use super::models::{AidTable, CohortTable, EnrollmentTable, IdSet};
use super::term::{adjust_term, construct_cohort, construct_transfer_cohort, Term};

/// Round a ratio to three decimal places
#[allow(clippy::cast_precision_loss)]
fn round3(numerator: usize, denominator: usize) -> f64 {
    let ratio = numerator as f64 / denominator as f64;
    (ratio * 1000.0).round() / 1000.0
}

/// Ratio of two counts rounded to three decimals.
///
/// `rate` and `denominator_name` only label the error raised when
/// `denominator` is zero.
///
/// # Errors
/// Returns `UndefinedRate` when `denominator` is zero.
pub fn rate(
    rate: &str,
    term: &Term,
    years_to_grad: Option<u32>,
    numerator: usize,
    denominator_name: &str,
    denominator: usize,
) -> Result<f64> {
    if denominator == 0 {
        return Err(MetricsError::undefined_rate(
            rate,
            term,
            years_to_grad,
            denominator_name,
        ));
    }
    Ok(round3(numerator, denominator))
}

fn intersection_len<'a>(a: &IdSet<'a>, b: &IdSet<'a>) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|id| large.contains(**id)).count()
}

fn intersect<'a>(a: &IdSet<'a>, b: &IdSet<'_>) -> IdSet<'a> {
    a.iter().filter(|id| b.contains(**id)).copied().collect()
}

/// Number of cohort-table rows in the term's first-time, full-time cohort
#[must_use]
pub fn cohort_size(cohort: &CohortTable<'_>, term: &Term) -> usize {
    let label = construct_cohort(term);
    let size = cohort.rows_in_cohort(&label).count();
    crate::debug!("cohort '{label}' has {size} row(s)");
    size
}

/// Number of students in the term's cohort who received Pell in the term's
/// aid year
#[must_use]
pub fn cohort_pell_count(aid: &AidTable<'_>, cohort: &CohortTable<'_>, term: &Term) -> usize {
    let label = construct_cohort(term);
    let pell = aid.recipient_ids(term);
    let members = cohort.ids_in_cohort(&label);
    let count = intersection_len(&pell, &members);
    crate::debug!(
        "cohort '{label}': {} pell id(s) for aid year {}, {} cohort id(s), {count} in both",
        pell.len(),
        aid.aid_year_for(term),
        members.len()
    );
    count
}

/// Distinct full-time, undergraduate, degree-seeking students enrolled in
/// `term`
#[must_use]
pub fn headcount(enrollment: &EnrollmentTable<'_>, term: &Term) -> usize {
    enrollment.fed_ids(term).len()
}

/// Fall headcount of full-time, degree-seeking undergraduates under one of
/// four population policies.
///
/// With `E` the enrolled ids, `P` the Pell ids for the term's aid year, and
/// `T` the ids in the term's incoming-transfer cohort:
///
/// | pell | transfer | result |
/// |---|---|---|
/// | false | false | `|E| - |T|` |
/// | true | false | `|P ∩ E| - |P ∩ E ∩ T|` |
/// | false | true | `|E ∩ T|` |
/// | true | true | `|P ∩ E ∩ T|` |
///
/// The non-transfer counts subtract the transfer cohort from the whole
/// enrollment rather than intersecting with the non-transfer cohorts:
/// enrolled students whose cohort is too old to appear in the cohort table
/// must still be counted as non-transfer. Because `|T|` is not limited to
/// enrolled students, the first row can be negative on inconsistent inputs.
#[must_use]
pub fn fall_enrollment(
    aid: &AidTable<'_>,
    cohort: &CohortTable<'_>,
    enrollment: &EnrollmentTable<'_>,
    term: &Term,
    pell: bool,
    transfer: bool,
) -> i64 {
    let enrolled = enrollment.fed_ids(term);
    let recipients = aid.recipient_ids(term);
    let transfers = cohort.ids_in_cohort(&construct_transfer_cohort(term));

    let pell_enrolled = intersect(&recipients, &enrolled);
    let pell_transfers = intersection_len(&pell_enrolled, &transfers);

    crate::debug!(
        "fall enrollment {term}: {} enrolled, {} pell, {} transfer cohort, {pell_transfers} pell transfers",
        enrolled.len(),
        recipients.len(),
        transfers.len()
    );

    let (minuend, subtrahend) = match (pell, transfer) {
        (false, false) => (enrolled.len(), transfers.len()),
        (true, false) => (pell_enrolled.len(), pell_transfers),
        (false, true) => (intersection_len(&enrolled, &transfers), 0),
        (true, true) => (pell_transfers, 0),
    };
    to_i64(minuend) - to_i64(subtrahend)
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Share of the term's cohort that graduated within `years_to_grad` years
///
/// # Errors
/// Returns `UndefinedRate` if the cohort is empty.
pub fn cohort_grad_rate(cohort: &CohortTable<'_>, term: &Term, years_to_grad: u32) -> Result<f64> {
    let label = construct_cohort(term);
    let graduates = cohort
        .rows_in_cohort(&label)
        .filter(|&row| cohort.graduated_within(row, years_to_grad))
        .count();
    let size = cohort_size(cohort, term);
    rate(
        "cohort_grad_rate",
        term,
        Some(years_to_grad),
        graduates,
        "cohort_size",
        size,
    )
}

/// Share of the term's Pell cohort that graduated within `years_to_grad`
/// years
///
/// # Errors
/// Returns `UndefinedRate` if no cohort member received Pell.
pub fn cohort_pell_grad_rate(
    aid: &AidTable<'_>,
    cohort: &CohortTable<'_>,
    term: &Term,
    years_to_grad: u32,
) -> Result<f64> {
    let label = construct_cohort(term);
    let graduates = cohort.ids_of(
        cohort
            .rows_in_cohort(&label)
            .filter(|&row| cohort.graduated_within(row, years_to_grad)),
    );
    let pell_graduates = intersection_len(&aid.recipient_ids(term), &graduates);
    let pell_cohort = cohort_pell_count(aid, cohort, term);
    rate(
        "cohort_pell_grad_rate",
        term,
        Some(years_to_grad),
        pell_graduates,
        "cohort_pell_count",
        pell_cohort,
    )
}

/// Share of the term's cohort still enrolled the following fall
///
/// # Errors
/// Returns `UndefinedRate` if the cohort is empty, or `InvalidTerm` if the
/// following year cannot be expressed as a term code.
pub fn second_year_retention_rate(cohort: &CohortTable<'_>, term: &Term) -> Result<f64> {
    let label = construct_cohort(term);
    let retention_term = adjust_term(term, 1)?;
    let retained = cohort
        .rows_in_cohort(&label)
        .filter(|&row| cohort.retained_at(row, &retention_term))
        .count();
    let size = cohort_size(cohort, term);
    rate(
        "second_year_retention_rate",
        term,
        None,
        retained,
        "cohort_size",
        size,
    )
}

/// Share of the term's Pell cohort still enrolled the following fall
///
/// # Errors
/// Returns `UndefinedRate` if no cohort member received Pell, or
/// `InvalidTerm` if the following year cannot be expressed as a term code.
pub fn second_year_retention_rate_pell(
    aid: &AidTable<'_>,
    cohort: &CohortTable<'_>,
    term: &Term,
) -> Result<f64> {
    let label = construct_cohort(term);
    let retention_term = adjust_term(term, 1)?;
    let retained = cohort.ids_of(
        cohort
            .rows_in_cohort(&label)
            .filter(|&row| cohort.retained_at(row, &retention_term)),
    );
    let pell_retained = intersection_len(&aid.recipient_ids(term), &retained);
    let pell_cohort = cohort_pell_count(aid, cohort, term);
    rate(
        "second_year_retention_rate_pell",
        term,
        None,
        pell_retained,
        "cohort_pell_count",
        pell_cohort,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ColumnConfig;
    use crate::core::models::Table;

    const COHORT: &str = "2025 Fall, Full-Time";
    const TRANSFER: &str = "2025 Fall, Transfer, Full-Time";

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn aid_table(ids: &[&str], year: &str) -> Table {
        Table::from_rows(
            strings(&["ID", "AID_YEAR"]),
            ids.iter().map(|id| strings(&[id, year])).collect(),
        )
    }

    /// (id, cohort name, years to graduation, second-fall period)
    fn cohort_table(rows: &[(&str, &str, &str, &str)]) -> Table {
        Table::from_rows(
            strings(&[
                "ID",
                "Cohort Name",
                "Years to Graduation",
                "Academic Period 2nd Fall",
            ]),
            rows.iter()
                .map(|(id, name, ytg, fall2)| strings(&[id, name, ytg, fall2]))
                .collect(),
        )
    }

    fn enrollment_table(ids: &[&str], term: &str) -> Table {
        Table::from_rows(
            strings(&["ID", "Academic Period", "Time Status", "Student Level", "Degree"]),
            ids.iter()
                .map(|id| strings(&[id, term, "FT", "UG", "BS"]))
                .collect(),
        )
    }

    fn fall_2025() -> Term {
        "202580".parse().unwrap()
    }

    #[test]
    fn pell_cohort_count_intersects_ids() {
        let columns = ColumnConfig::default();
        let aid = aid_table(&["1", "2", "3"], "2025");
        let cohort = cohort_table(&[
            ("2", COHORT, "", ""),
            ("3", COHORT, "", ""),
            ("4", COHORT, "", ""),
        ]);
        let aid = AidTable::new(&aid, &columns).unwrap();
        let cohort = CohortTable::new(&cohort, &columns).unwrap();

        assert_eq!(cohort_pell_count(&aid, &cohort, &fall_2025()), 2);
        assert_eq!(cohort_size(&cohort, &fall_2025()), 3);
    }

    #[test]
    fn cohort_size_counts_rows_with_null_ids() {
        let columns = ColumnConfig::default();
        let cohort = cohort_table(&[("", COHORT, "", ""), ("1", COHORT, "", ""), ("2", TRANSFER, "", "")]);
        let cohort = CohortTable::new(&cohort, &columns).unwrap();
        assert_eq!(cohort_size(&cohort, &fall_2025()), 2);
    }

    #[test]
    fn grad_rate_counts_within_threshold() {
        let columns = ColumnConfig::default();
        let ytg = ["3", "4", "4.0", "4", "5", "6", "", "n/a", "7", "5"];
        let rows: Vec<(String, &str)> = ytg
            .iter()
            .enumerate()
            .map(|(i, y)| (i.to_string(), *y))
            .collect();
        let rows: Vec<(&str, &str, &str, &str)> = rows
            .iter()
            .map(|(id, y)| (id.as_str(), COHORT, *y, ""))
            .collect();
        let cohort = cohort_table(&rows);
        let cohort = CohortTable::new(&cohort, &columns).unwrap();

        assert!((cohort_grad_rate(&cohort, &fall_2025(), 4).unwrap() - 0.4).abs() < f64::EPSILON);
        assert!((cohort_grad_rate(&cohort, &fall_2025(), 6).unwrap() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn retention_uses_following_fall() {
        let columns = ColumnConfig::default();
        let cohort = cohort_table(&[
            ("1", COHORT, "", "202680"),
            ("2", COHORT, "", "202680"),
            ("3", COHORT, "", "202780"),
            ("4", COHORT, "", ""),
            ("5", TRANSFER, "", "202680"),
            ("6", COHORT, "", "202680"),
        ]);
        let aid = aid_table(&["1", "3", "4", "5"], "2025");
        let cohort = CohortTable::new(&cohort, &columns).unwrap();
        let aid = AidTable::new(&aid, &columns).unwrap();

        let rate = second_year_retention_rate(&cohort, &fall_2025()).unwrap();
        assert!((rate - 0.6).abs() < f64::EPSILON);

        let pell_rate = second_year_retention_rate_pell(&aid, &cohort, &fall_2025()).unwrap();
        assert!((pell_rate - 0.333).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_cohort_rates_are_undefined() {
        let columns = ColumnConfig::default();
        let cohort = cohort_table(&[("1", "2024 Fall, Full-Time", "4", "202580")]);
        let aid = aid_table(&["1"], "2024");
        let cohort = CohortTable::new(&cohort, &columns).unwrap();
        let aid = AidTable::new(&aid, &columns).unwrap();
        let term = fall_2025();

        let results = [
            cohort_grad_rate(&cohort, &term, 4),
            cohort_pell_grad_rate(&aid, &cohort, &term, 6),
            second_year_retention_rate(&cohort, &term),
            second_year_retention_rate_pell(&aid, &cohort, &term),
        ];
        for result in results {
            match result {
                Err(MetricsError::UndefinedRate { term, .. }) => assert_eq!(term, "202580"),
                other => panic!("expected UndefinedRate, got {other:?}"),
            }
        }
    }

    #[test]
    fn fall_enrollment_policies() {
        let columns = ColumnConfig::default();
        let enrolled: Vec<String> = (1..=20).map(|i| i.to_string()).collect();
        let enrolled: Vec<&str> = enrolled.iter().map(String::as_str).collect();
        let enrollment = enrollment_table(&enrolled, "202580");
        // Transfers 1-4 enrolled, 99 transferred in but not enrolled
        let cohort = cohort_table(&[
            ("1", TRANSFER, "", ""),
            ("2", TRANSFER, "", ""),
            ("3", TRANSFER, "", ""),
            ("4", TRANSFER, "", ""),
            ("99", TRANSFER, "", ""),
            ("5", COHORT, "", ""),
        ]);
        let aid = aid_table(&["1", "2", "5", "6", "7", "99", "100"], "2025");

        let enrollment = EnrollmentTable::new(&enrollment, &columns).unwrap();
        let cohort = CohortTable::new(&cohort, &columns).unwrap();
        let aid = AidTable::new(&aid, &columns).unwrap();
        let term = fall_2025();

        assert_eq!(fall_enrollment(&aid, &cohort, &enrollment, &term, false, false), 15);
        assert_eq!(fall_enrollment(&aid, &cohort, &enrollment, &term, true, false), 3);
        assert_eq!(fall_enrollment(&aid, &cohort, &enrollment, &term, false, true), 4);
        assert_eq!(fall_enrollment(&aid, &cohort, &enrollment, &term, true, true), 2);
        assert_eq!(headcount(&enrollment, &term), 20);
    }

    #[test]
    fn rate_rounds_to_three_decimals() {
        let term = fall_2025();
        assert!((rate("r", &term, None, 1, "d", 3).unwrap() - 0.333).abs() < f64::EPSILON);
        assert!((rate("r", &term, None, 2, "d", 3).unwrap() - 0.667).abs() < f64::EPSILON);
        assert!((rate("r", &term, None, 0, "d", 7).unwrap()).abs() < f64::EPSILON);
        assert!(rate("r", &term, None, 0, "d", 0).is_err());
    }
}
