//! The full pipeline: expand, build, dedupe and merge, one record at a time.

use crate::dedupe::dedupe;
use crate::error::{Error, Result};
use crate::expand::{Expander, SiblingMode, DEFAULT_MAX_DEPTH};
use crate::fields::FieldConfig;
use crate::merge::merge;
use crate::path;
use crate::row::{build_row, render, Row, DEFAULT_LIST_SEPARATOR};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub sibling_mode: SiblingMode,
    pub list_separator: String,
    pub max_depth: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            sibling_mode: SiblingMode::Cartesian,
            list_separator: DEFAULT_LIST_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub rows_before_merge: usize,
    pub rows_after_merge: usize,
}

impl RunStats {
    pub fn reduction_percent(&self) -> f64 {
        if self.rows_before_merge == 0 {
            return 0.0;
        }
        let removed = self.rows_before_merge - self.rows_after_merge;
        removed as f64 * 100.0 / self.rows_before_merge as f64
    }
}

/// Generated rows together with the column header they are laid out against.
#[derive(Debug, Clone)]
pub struct Report {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub stats: RunStats,
}

impl Report {
    /// Value of `field` in `row`, or `None` when the field is not a column.
    pub fn value<'r>(&self, row: &'r Row, field: &str) -> Option<&'r str> {
        let index = self.header.iter().position(|h| h == field)?;
        Some(row.get(index))
    }

    pub fn to_maps(&self) -> Vec<Map<String, Value>> {
        self.rows.iter().map(|row| row.to_map(&self.header)).collect()
    }

    /// Lays out rows that were flattened earlier (for example a previous JSON output) as a
    /// report. Columns are the keys in order of first appearance; a row missing a key gets
    /// an empty cell there.
    pub fn from_flat_rows(rows: &[Value], separator: &str) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::NoRows);
        }
        let mut header: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or(Error::NotARowObject { index })?;
            for key in object.keys() {
                if !header.contains(key) {
                    header.push(key.clone());
                }
            }
            objects.push(object);
        }

        let rows: Vec<Row> = objects
            .iter()
            .map(|object| {
                Row::new(
                    header
                        .iter()
                        .map(|key| object.get(key).map(|v| render(v, separator)).unwrap_or_default())
                        .collect(),
                )
            })
            .collect();
        debug!(columns = header.len(), rows = rows.len(), "loaded flat rows");
        Ok(Self {
            header,
            stats: RunStats {
                records: rows.len(),
                rows_before_merge: rows.len(),
                rows_after_merge: rows.len(),
            },
            rows,
        })
    }
}

pub struct ReportGenerator {
    fields: FieldConfig,
    group_key: usize,
    options: GenerateOptions,
}

impl ReportGenerator {
    /// Fails when `group_key` is not one of the configured fields.
    pub fn new(fields: FieldConfig, group_key: &str, options: GenerateOptions) -> Result<Self> {
        let group_key = fields
            .index_of(group_key.trim())
            .ok_or_else(|| Error::GroupKeyNotConfigured {
                group_key: group_key.to_string(),
            })?;
        Ok(Self {
            fields,
            group_key,
            options,
        })
    }

    pub fn fields(&self) -> &FieldConfig {
        &self.fields
    }

    pub fn header(&self) -> Vec<String> {
        self.fields.header()
    }

    /// Rows for one record before and after merging.
    pub fn record_rows(&self, record: &Value) -> Result<(usize, Vec<Row>)> {
        if !record.is_object() {
            warn!("record is not a JSON object, its fields resolve to empty");
        }
        let contexts = Expander::new(&self.fields)
            .with_mode(self.options.sibling_mode)
            .with_max_depth(self.options.max_depth)
            .expand(record)?;

        let rows: Vec<Row> = contexts
            .iter()
            .map(|ctx| build_row(ctx, &self.fields, &self.options.list_separator))
            .collect();
        let before = rows.len();
        let merged = merge(dedupe(rows, self.group_key), self.group_key);
        Ok((before, merged))
    }

    /// Runs every record through the pipeline and concatenates the rows in input order.
    /// The first failing record aborts the run.
    pub fn generate(&self, records: &[Value]) -> Result<Report> {
        let mut stats = RunStats {
            records: records.len(),
            ..Default::default()
        };
        let mut rows = Vec::new();
        let group_field = &self.fields.fields()[self.group_key];

        for record in records {
            let (before, merged) = self.record_rows(record)?;
            let group = path::get(record, group_field.segments())
                .map(|v| render(v, &self.options.list_separator))
                .unwrap_or_default();
            debug!(%group, before, after = merged.len(), "flattened record");
            stats.rows_before_merge += before;
            stats.rows_after_merge += merged.len();
            rows.extend(merged);
        }

        info!(
            records = stats.records,
            before = stats.rows_before_merge,
            after = stats.rows_after_merge,
            "generated rows ({:.1}% reduction)",
            stats.reduction_percent()
        );
        Ok(Report {
            header: self.header(),
            rows,
            stats,
        })
    }
}

/// Flattens `records` with the default options.
pub fn generate_rows<S: AsRef<str>>(
    records: &[Value],
    fields: &[S],
    group_key: &str,
) -> Result<Vec<Row>> {
    let fields = FieldConfig::new(fields)?;
    let generator = ReportGenerator::new(fields, group_key, GenerateOptions::default())?;
    Ok(generator.generate(records)?.rows)
}
