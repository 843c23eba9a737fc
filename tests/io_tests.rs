//! Integration tests for table files and result naming

use chrono::NaiveDate;
use ir_metrics::core::io::{
    output_results, read_table, results_filename, write_table, FileDecoration, TableFormat,
};
use ir_metrics::core::models::Table;
use ir_metrics::MetricsError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sample() -> Table {
    Table::from_rows(
        vec!["ID".into(), "Cohort Name".into(), "Years to Graduation".into()],
        vec![
            vec!["00123".into(), "2025 Fall, Full-Time".into(), "4".into()],
            vec!["00456".into(), "2025 Fall, Transfer, Full-Time".into(), String::new()],
        ],
    )
}

#[test]
fn csv_round_trip_keeps_text() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cohort.csv");
    write_table(&sample(), &path).expect("write csv");

    let table = read_table(&path).expect("read csv");
    assert_eq!(table.headers(), sample().headers());
    assert_eq!(table.rows()[0][0], "00123");
    assert_eq!(table.rows()[1][1], "2025 Fall, Transfer, Full-Time");
    assert_eq!(table.cell(1, 2), None);
}

#[test]
fn txt_files_are_tab_delimited() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("census.txt");
    fs::write(&path, "ID\tAcademic Period\n1\t202580\n2\t202580\n").expect("write txt");

    let table = read_table(&path).expect("read txt");
    assert_eq!(table.len(), 2);
    assert_eq!(table.column_index("Academic Period"), Some(1));
    assert_eq!(table.cell(1, 0), Some("2"));

    let out = dir.path().join("copy.txt");
    write_table(&table, &out).expect("write txt");
    let written = fs::read_to_string(&out).expect("read back");
    assert!(written.starts_with("ID\tAcademic Period\n"));
}

#[test]
fn short_records_are_padded() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "ID,AID_YEAR,Extra\n1,2025\n").expect("write csv");

    let table = read_table(&path).expect("read csv");
    assert_eq!(table.rows()[0].len(), 3);
    assert_eq!(table.cell(0, 2), None);
}

#[test]
fn xlsx_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cohort.xlsx");
    write_table(&sample(), &path).expect("write xlsx");

    let table = read_table(&path).expect("read xlsx");
    assert_eq!(table.headers(), sample().headers());
    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(0, 0), Some("00123"));
    assert_eq!(table.cell(1, 2), None);
}

#[test]
fn unsupported_and_missing_files() {
    let dir = TempDir::new().expect("temp dir");
    let json = dir.path().join("data.json");
    fs::write(&json, "{}").expect("write json");

    assert!(matches!(
        read_table(&json),
        Err(MetricsError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        read_table(&dir.path().join("absent.csv")),
        Err(MetricsError::FileNotFound(_))
    ));
    assert!(matches!(
        write_table(&sample(), &dir.path().join("out.parquet")),
        Err(MetricsError::UnsupportedFormat { .. })
    ));
}

#[test]
fn result_names_carry_date_and_version() {
    let day = NaiveDate::from_ymd_opt(2025, 12, 13).expect("date");
    let name = results_filename(Path::new("my_file.xlsx"), &FileDecoration::dated("0.3.2"), day)
        .expect("name");
    assert_eq!(name, Path::new("my_file_2025-12-13_v0-3-2.xlsx"));
    assert_eq!(TableFormat::from_path(&name).expect("format"), TableFormat::Xlsx);
}

#[test]
fn output_results_creates_directory_and_decorates() {
    let dir = TempDir::new().expect("temp dir");
    let target = dir.path().join("results").join("pell.csv");
    let decoration = FileDecoration {
        append_date: false,
        version: Some("1.2.3".to_string()),
    };

    let written = output_results(&sample(), &target, &decoration).expect("output");
    assert_eq!(written, dir.path().join("results").join("pell_v1-2-3.csv"));
    assert!(written.exists());
    assert!(!target.exists());
}

#[test]
fn xlsx_export_replaces_existing_workbook() {
    use calamine::{open_workbook_auto, Reader};
    use ir_metrics::core::io::xlsx::REPORT_SHEET;

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("results.xlsx");

    let mut existing = rust_xlsxwriter::Workbook::new();
    existing
        .add_worksheet()
        .set_name("Notes")
        .expect("sheet name")
        .write_string(0, 0, "keep me?")
        .expect("write cell");
    existing.save(&path).expect("save workbook");

    write_table(&sample(), &path).expect("write xlsx");

    let workbook = open_workbook_auto(&path).expect("open workbook");
    assert_eq!(workbook.sheet_names(), vec![REPORT_SHEET.to_string()]);
}
