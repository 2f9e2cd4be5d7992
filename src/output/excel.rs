//! Single-sheet workbook: bold header row, frozen under the header, autofit columns.

use super::TabularWriter;
use crate::error::Result;
use crate::row::Row;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

pub struct ExcelWriter {
    path: PathBuf,
    worksheet_name: String,
}

impl ExcelWriter {
    pub fn new(path: &Path, worksheet_name: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            worksheet_name: worksheet_name.to_string(),
        }
    }
}

pub fn build_workbook(worksheet_name: &str, header: &[String], rows: &[Row]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(worksheet_name)?;
    for (col, title) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header_format)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let line = idx as u32 + 1;
        for (col, value) in row.values().iter().enumerate() {
            // blank cells stay unwritten, the way merged cells look
            if value.is_empty() {
                continue;
            }
            match numeric_cell(value) {
                Some(number) => worksheet.write_number(line, col as u16, number)?,
                None => worksheet.write_string(line, col as u16, value)?,
            };
        }
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    Ok(workbook)
}

/// Values that read back exactly as written are stored as numbers. Codes such as `007`
/// or `1e3` stay text.
fn numeric_cell(value: &str) -> Option<f64> {
    let number: f64 = value.parse().ok()?;
    (number.is_finite() && number.to_string() == value).then_some(number)
}

impl TabularWriter for ExcelWriter {
    fn write(&mut self, header: &[String], rows: &[Row]) -> Result<()> {
        let mut workbook = build_workbook(&self.worksheet_name, header, rows)?;
        workbook.save(&self.path)?;
        Ok(())
    }
}
