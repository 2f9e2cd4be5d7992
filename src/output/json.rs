//! JSON output: one object per row, keyed by field path or rebuilt into nested objects.

use super::TabularWriter;
use crate::error::{Error, Result};
use crate::path::{self, FieldPath};
use crate::row::Row;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonLayout {
    /// `{"responders.agency": "A"}`
    #[default]
    Flat,
    /// `{"responders": {"agency": "A"}}`
    Nested,
}

/// Writes the rows as one pretty-printed JSON array of objects.
pub struct JsonWriter<W: Write> {
    out: W,
    layout: JsonLayout,
}

impl JsonWriter<BufWriter<File>> {
    pub fn create(path: &Path, layout: JsonLayout) -> Result<Self> {
        Ok(Self::from_writer(BufWriter::new(File::create(path)?), layout))
    }
}

impl<W: Write> JsonWriter<W> {
    pub fn from_writer(out: W, layout: JsonLayout) -> Self {
        Self { out, layout }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TabularWriter for JsonWriter<W> {
    fn write(&mut self, header: &[String], rows: &[Row]) -> Result<()> {
        if self.layout == JsonLayout::Nested {
            check_nestable(header)?;
        }
        let docs: Vec<Value> = rows
            .iter()
            .map(|row| match self.layout {
                JsonLayout::Flat => Value::Object(row.to_map(header)),
                JsonLayout::Nested => nest(header, row),
            })
            .collect();
        serde_json::to_writer_pretty(&mut self.out, &docs)?;
        self.out.flush()?;
        Ok(())
    }
}

/// A field that is also the parent of another field has no place in a nested object.
fn check_nestable(header: &[String]) -> Result<()> {
    let paths = header
        .iter()
        .map(|field| FieldPath::parse(field))
        .collect::<Result<Vec<_>>>()?;
    for parent in &paths {
        if let Some(child) = paths.iter().find(|p| parent.is_strict_prefix_of(p)) {
            return Err(Error::Config(format!(
                "nested JSON cannot hold both `{}` and `{}`",
                parent, child
            )));
        }
    }
    Ok(())
}

fn nest(header: &[String], row: &Row) -> Value {
    let mut doc = Value::Object(Map::new());
    for (field, value) in header.iter().zip(row.values()) {
        let segments: Vec<String> = field.split('.').map(str::to_string).collect();
        path::set(&mut doc, &segments, Value::String(value.clone()));
    }
    doc
}
