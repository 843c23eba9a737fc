//! Comma- and tab-delimited tables

use super::TableExporter;
use crate::core::errors::Result;
use crate::core::models::Table;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Read a delimited file whose first record is the header row.
///
/// Short records are padded and long records truncated to the header width.
pub(super) fn read(path: &Path, delimiter: u8) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(ToString::to_string).collect();
    let mut table = Table::new(headers);
    for result in rdr.records() {
        let record = result?;
        table.push_row(record.iter().map(ToString::to_string).collect());
    }
    Ok(table)
}

/// Delimited-text exporter
#[derive(Debug, Clone, Copy)]
pub struct DelimitedExporter {
    delimiter: u8,
}

impl DelimitedExporter {
    /// Exporter separating fields with `delimiter`
    #[must_use]
    pub const fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl TableExporter for DelimitedExporter {
    fn export(&self, table: &Table, output_path: &Path) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(output_path)?;
        wtr.write_record(table.headers())?;
        for row in table.rows() {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
