//! Writers that lay generated rows out as a table. Every writer receives the header
//! (configured field paths, in column order) and rows whose values follow that order.

pub mod delimited;
pub mod excel;
pub mod json;

use crate::error::Result;
use crate::generator::Report;
use crate::row::Row;
use clap::ValueEnum;
use std::path::Path;

pub use delimited::CsvWriter;
pub use excel::ExcelWriter;
pub use json::{JsonLayout, JsonWriter};

pub trait TabularWriter {
    fn write(&mut self, header: &[String], rows: &[Row]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Xlsx,
}

impl OutputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub worksheet_name: String,
    pub json_layout: JsonLayout,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            worksheet_name: crate::config::DEFAULT_WORKSHEET_NAME.to_string(),
            json_layout: JsonLayout::Flat,
        }
    }
}

pub fn write_report(
    report: &Report,
    path: &Path,
    format: OutputFormat,
    options: &WriteOptions,
) -> Result<()> {
    match format {
        OutputFormat::Csv => CsvWriter::create(path)?.write(&report.header, &report.rows),
        OutputFormat::Json => JsonWriter::create(path, options.json_layout)?
            .write(&report.header, &report.rows),
        OutputFormat::Xlsx => ExcelWriter::new(path, &options.worksheet_name)
            .write(&report.header, &report.rows),
    }
}
