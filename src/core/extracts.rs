//! Id-list extracts for offline annotation
//!
//! Each extract is a plain projection of filtered source rows. Staff fill in
//! Pell and first-generation flags by hand and the annotated workbook later
//! comes back as an aid table.

use super::config::ColumnConfig;
use super::errors::{Result, TableKind};
use super::io::write_table;
use super::models::{EnrollmentTable, Table};
use super::term::{academic_year_from_term, AcademicYear, Term};
use super::validation::require_columns;
use std::path::{Path, PathBuf};

/// Header row of the enrolled-students extract
pub const ENROLLED_HEADERS: [&str; 4] = ["ID", "Person Uid", "Academic Period", "Aid Year"];

/// Header row of the cohort-year extract
pub const COHORT_HEADERS: [&str; 4] = ["ID", "Person Uid", "Cohort", "Cohort Term"];

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| (*h).to_string()).collect()
}

fn cell(table: &Table, row: usize, col: usize) -> String {
    table.cell(row, col).unwrap_or_default().to_string()
}

/// Full-time, degree-seeking undergraduates enrolled in `term`, one row per
/// enrollment record, tagged with the term and its four-digit aid year
///
/// # Errors
/// Returns `MissingColumns` if the person identifier column is absent.
pub fn enrolled_students_extract(
    enrollment: &EnrollmentTable<'_>,
    columns: &ColumnConfig,
    term: &Term,
) -> Result<Table> {
    let source = enrollment.table();
    require_columns(source, TableKind::Enrollment, &[columns.person_uid.as_str()])?;
    let id = source.column_index(&columns.id).unwrap_or_default();
    let person_uid = source.column_index(&columns.person_uid).unwrap_or_default();

    let code = term.to_string();
    let aid_year = academic_year_from_term(term, false);
    let mut extract = Table::new(headers(&ENROLLED_HEADERS));
    for row in enrollment.fed_rows(term) {
        extract.push_row(vec![
            cell(source, row, id),
            cell(source, row, person_uid),
            code.clone(),
            aid_year.clone(),
        ]);
    }
    crate::debug!("enrolled extract for {code}: {} row(s)", extract.len());
    Ok(extract)
}

/// Students cohorted into any term of `academic_year`, matched on the
/// cohort fiscal year
///
/// # Errors
/// Returns `MissingColumns` if any projected or filtered column is absent.
pub fn cohort_year_extract(
    cohort: &Table,
    columns: &ColumnConfig,
    academic_year: &AcademicYear,
) -> Result<Table> {
    let required = [
        columns.id.as_str(),
        columns.person_uid.as_str(),
        columns.cohort.as_str(),
        columns.cohort_academic_period.as_str(),
        columns.cohort_fiscal_year.as_str(),
    ];
    require_columns(cohort, TableKind::Cohort, &required)?;
    let [id, person_uid, code, period, fiscal] =
        required.map(|name| cohort.column_index(name).unwrap_or_default());

    let fiscal_year = academic_year.fiscal_year();
    let mut extract = Table::new(headers(&COHORT_HEADERS));
    for row in 0..cohort.len() {
        if cohort.cell(row, fiscal) == Some(fiscal_year.as_str()) {
            extract.push_row(vec![
                cell(cohort, row, id),
                cell(cohort, row, person_uid),
                cell(cohort, row, code),
                cell(cohort, row, period),
            ]);
        }
    }
    crate::debug!(
        "cohort extract for fiscal year {fiscal_year}: {} row(s)",
        extract.len()
    );
    Ok(extract)
}

/// File name of the enrolled-students extract for `term`
#[must_use]
pub fn enrolled_extract_filename(term: &Term) -> String {
    format!(
        "Fall {:04} Enrolled Full-Time Student IDs from Census Data Enrollment.xlsx",
        term.calendar_year()
    )
}

/// File name of the cohort-year extract for `academic_year`
#[must_use]
pub fn cohort_extract_filename(academic_year: &AcademicYear) -> String {
    format!("{academic_year} All-Cohorts Student IDs from Undergraduate Retention and Graduation.xlsx")
}

/// Write an extract into `out_dir` under `file_name`, creating the directory
///
/// # Errors
/// Returns a directory creation or write error.
pub fn save_extract(extract: &Table, out_dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(file_name);
    write_table(extract, &path)?;
    crate::info!("wrote extract {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn enrolled_extract_projects_filtered_rows() {
        let source = table(
            &["ID", "Person Uid", "Academic Period", "Time Status", "Student Level", "Degree"],
            &[
                &["1", "p1", "202580", "FT", "UG", "BS"],
                &["2", "p2", "202580", "PT", "UG", "BS"],
                &["3", "p3", "202580", "FT", "UG", "Non Degree"],
            ],
        );
        let columns = ColumnConfig::default();
        let enrollment = EnrollmentTable::new(&source, &columns).unwrap();
        let term: Term = "202580".parse().unwrap();

        let extract = enrolled_students_extract(&enrollment, &columns, &term).unwrap();
        assert_eq!(extract.headers(), &ENROLLED_HEADERS);
        assert_eq!(extract.rows(), &[vec!["1", "p1", "202580", "2025"]]);
    }

    #[test]
    fn enrolled_extract_needs_person_uid() {
        let source = table(
            &["ID", "Academic Period", "Time Status", "Student Level", "Degree"],
            &[],
        );
        let columns = ColumnConfig::default();
        let enrollment = EnrollmentTable::new(&source, &columns).unwrap();
        let term: Term = "202580".parse().unwrap();
        let err = enrolled_students_extract(&enrollment, &columns, &term).unwrap_err();
        assert!(err.to_string().contains("'Person Uid'"));
    }

    #[test]
    fn cohort_extract_matches_fiscal_year() {
        let source = table(
            &["ID", "Person Uid", "Cohort", "Cohort Academic Period", "Cohort Fiscal Year"],
            &[
                &["1", "p1", "FTFT", "202580", "2026"],
                &["2", "p2", "TRFT", "202610", "2026"],
                &["3", "p3", "FTFT", "202480", "2025"],
            ],
        );
        let year: AcademicYear = "2025-2026".parse().unwrap();
        let extract = cohort_year_extract(&source, &ColumnConfig::default(), &year).unwrap();
        assert_eq!(extract.headers(), &COHORT_HEADERS);
        assert_eq!(extract.len(), 2);
        assert_eq!(extract.rows()[1], vec!["2", "p2", "TRFT", "202610"]);
    }

    #[test]
    fn extract_file_names() {
        let term: Term = "202580".parse().unwrap();
        assert_eq!(
            enrolled_extract_filename(&term),
            "Fall 2025 Enrolled Full-Time Student IDs from Census Data Enrollment.xlsx"
        );
        let year: AcademicYear = "2025-2026".parse().unwrap();
        assert_eq!(
            cohort_extract_filename(&year),
            "2025-2026 All-Cohorts Student IDs from Undergraduate Retention and Graduation.xlsx"
        );
    }
}
