//! Term command handler

use ir_metrics::core::term::{
    academic_year_from_term, adjust_term, construct_cohort, construct_transfer_cohort, Term,
};

/// Labels derived from one term code, in display order
fn describe(term: &Term) -> Vec<(&'static str, String)> {
    vec![
        ("Term", term.to_string()),
        ("Season", term.season().to_string()),
        ("Academic year", term.academic_year().to_string()),
        ("Aid year", academic_year_from_term(term, false)),
        ("Aid year (two-digit)", academic_year_from_term(term, true)),
        ("Cohort", construct_cohort(term)),
        ("Transfer cohort", construct_transfer_cohort(term)),
    ]
}

/// Print the labels for `term`, shifted by `shift` years when given.
///
/// Exits with status 1 for an invalid code or an out-of-range shift.
pub fn run(term: &str, shift: Option<i32>) {
    let parsed = term.parse::<Term>().and_then(|t| match shift {
        Some(years) => adjust_term(&t, years),
        None => Ok(t),
    });
    let term = match parsed {
        Ok(term) => term,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    for (label, value) in describe(&term) {
        println!("{label:<22}{value}");
    }
}
