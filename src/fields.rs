//! The configured column set and the prefixes where arrays may expand.

use crate::error::{Error, Result};
use crate::path::FieldPath;
use serde_json::Value;
use tracing::{debug, warn};

/// The configured columns, in output order, plus every strict prefix of them. Prefixes are
/// the only places an array can turn into extra rows.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    fields: Vec<FieldPath>,
    prefixes: Vec<FieldPath>,
}

impl FieldConfig {
    /// Parses dotted paths. Duplicates keep their first position and are otherwise ignored.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<FieldPath> = Vec::new();
        for (index, raw) in fields.into_iter().enumerate() {
            let path = FieldPath::parse(raw.as_ref()).map_err(|err| match err {
                Error::EmptyFieldPath { .. } => Error::EmptyFieldPath { index },
                other => other,
            })?;
            if parsed.contains(&path) {
                warn!(field = %path, "ignoring duplicate configured field");
                continue;
            }
            parsed.push(path);
        }
        if parsed.is_empty() {
            return Err(Error::EmptyFieldConfig);
        }

        let mut prefixes: Vec<FieldPath> = Vec::new();
        for prefix in parsed.iter().flat_map(|f| f.strict_prefixes()) {
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        // stable: declaration order survives within one depth
        prefixes.sort_by_key(FieldPath::depth);

        Ok(Self {
            fields: parsed,
            prefixes,
        })
    }

    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    pub fn prefixes(&self) -> &[FieldPath] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.as_str() == field)
    }

    pub fn header(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.to_string()).collect()
    }
}

/// Derives a field list from the data: every leaf path of every record, in order of first
/// appearance. Arrays contribute the structure of their first element; arrays of scalars
/// and empty arrays are leaves. A path that turns out to be the parent of another one is
/// dropped in favour of its children.
pub fn discover(records: &[Value]) -> Result<FieldConfig> {
    let mut found: Vec<String> = Vec::new();
    for record in records {
        collect_leaves(record, "", &mut found);
    }
    let leaves: Vec<&String> = found
        .iter()
        .filter(|field| {
            let nested = format!("{}.", field);
            !found.iter().any(|other| other.starts_with(&nested))
        })
        .collect();
    debug!(fields = leaves.len(), "discovered fields from input");
    FieldConfig::new(leaves)
}

fn collect_leaves(value: &Value, parent: &str, found: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        if key.is_empty() || key.contains('.') {
            warn!(key = %key, "skipping key that cannot be written as a field path");
            continue;
        }
        let field = if parent.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", parent, key)
        };
        match child {
            Value::Object(_) => collect_leaves(child, &field, found),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                collect_leaves(&items[0], &field, found)
            }
            _ => {
                if !found.contains(&field) {
                    found.push(field);
                }
            }
        }
    }
}
