//! CSV output.

use super::TabularWriter;
use crate::error::{Error, Result};
use crate::row::Row;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header record first, then one record per row.
pub struct CsvWriter<W: Write> {
    wtr: Writer<W>,
}

impl CsvWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            wtr: Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            wtr: Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> TabularWriter for CsvWriter<W> {
    fn write(&mut self, header: &[String], rows: &[Row]) -> Result<()> {
        self.wtr.write_record(header)?;
        for row in rows {
            self.wtr.write_record(row.values())?;
        }
        self.wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells_stay_in_place() {
        let header = vec!["incidentId".to_string(), "responders.agency".to_string()];
        let rows = vec![
            Row::new(vec!["I1".into(), "A, B".into()]),
            Row::new(vec!["".into(), "C".into()]),
        ];
        let mut writer = CsvWriter::from_writer(Vec::new());
        writer.write(&header, &rows).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text, "incidentId,responders.agency\nI1,\"A, B\"\n,C\n");
    }
}
