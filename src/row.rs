//! Output rows and the rendering of JSON values into cell text.

use crate::context::{Context, OwnerKey};
use crate::fields::FieldConfig;
use serde_json::{Map, Value};

pub const DEFAULT_LIST_SEPARATOR: &str = ", ";

/// One output line: a rendered value per configured field, in column order. An empty
/// string means "not applicable or already shown". Each value remembers the array
/// element it came from so repeats can be recognised per owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
    owners: Vec<OwnerKey>,
}

impl Row {
    /// A row whose values all belong to the root owner.
    pub fn new(values: Vec<String>) -> Self {
        let owners = vec![OwnerKey::root(); values.len()];
        Self { values, owners }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn owner(&self, index: usize) -> Option<&OwnerKey> {
        self.owners.get(index)
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn is_blank(&self, index: usize) -> bool {
        self.get(index).is_empty()
    }

    /// True when no configured field carries a value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    pub(crate) fn blank(&mut self, index: usize) {
        if let Some(value) = self.values.get_mut(index) {
            value.clear();
        }
    }

    pub(crate) fn take_cell(&mut self, other: &Row, index: usize) {
        self.values[index].clone_from(&other.values[index]);
        self.owners[index].clone_from(&other.owners[index]);
    }

    /// Field path to value, in column order.
    pub fn to_map(&self, header: &[String]) -> Map<String, Value> {
        header
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.clone(), Value::String(value.clone())))
            .collect()
    }
}

/// Resolves every configured field through `ctx`. Missing values become empty strings;
/// arrays that were not expanded (lists of tags, lane numbers) are joined with `separator`.
pub fn build_row(ctx: &Context<'_>, fields: &FieldConfig, separator: &str) -> Row {
    let (values, owners): (Vec<String>, Vec<OwnerKey>) = fields
        .fields()
        .iter()
        .map(|field| {
            let value = ctx
                .field_value(field)
                .map(|v| render(v, separator))
                .unwrap_or_default();
            (value, ctx.owner_of(field))
        })
        .unzip();
    Row { values, owners }
}

pub fn render(value: &Value, separator: &str) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(json_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator),
        other => json_to_string(other),
    }
}

fn json_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // nested objects keep their compact JSON form
        other => other.to_string(),
    }
}
