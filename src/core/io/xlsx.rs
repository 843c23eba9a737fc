//! Excel workbooks
//!
//! Reads take the first worksheet with its first row as headers. Writes create
//! a fresh workbook holding a single sheet; every cell is written as text so
//! identifiers keep their leading zeros.

use super::TableExporter;
use crate::core::errors::{MetricsError, Result};
use crate::core::models::Table;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Name of the worksheet result tables are written to
pub const REPORT_SHEET: &str = "Report Output";

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(super) fn read(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MetricsError::EmptyWorkbook(path.to_path_buf()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(cell_text).collect())
        .unwrap_or_default();
    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_text).collect());
    }
    Ok(table)
}

/// Workbook exporter writing to the [`REPORT_SHEET`] sheet
///
/// The target file is replaced, not updated: any workbook already at the
/// output path loses all of its sheets, including ones unrelated to the
/// report. Keep the date suffix on when earlier results must survive a rerun.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl TableExporter for XlsxExporter {
    fn export(&self, table: &Table, output_path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(REPORT_SHEET)?;

        for (col, header) in table.headers().iter().enumerate() {
            worksheet.write_string(0, column_number(col), header)?;
        }
        for (r, row) in table.rows().iter().enumerate() {
            let row_number = u32::try_from(r + 1).unwrap_or(u32::MAX);
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(row_number, column_number(col), value)?;
                }
            }
        }

        workbook.save(output_path)?;
        Ok(())
    }
}

// Out-of-range positions are rejected by the worksheet itself.
fn column_number(col: usize) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX)
}
