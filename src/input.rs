//! Loading records: a JSON array, a single JSON object, or JSON Lines.

use crate::error::{Error, Result};
use serde_json::{from_str, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

pub fn read_records(path: &Path) -> Result<Vec<Value>> {
    let mut content = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut content)?;
    parse_records(&content)
}

pub fn parse_records(content: &str) -> Result<Vec<Value>> {
    match content.trim_start().chars().next() {
        None => Ok(Vec::new()),
        Some('[') => match from_str::<Value>(content)? {
            Value::Array(records) => Ok(records),
            _ => Err(Error::NotAnArray),
        },
        Some('{') => match from_str::<Value>(content) {
            Ok(record) => Ok(vec![record]),
            // several objects, one per line
            Err(_) => parse_lines(content.as_bytes()),
        },
        Some(_) => Err(Error::NotAnArray),
    }
}

fn parse_lines(reader: impl BufRead) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        // Skip blank lines
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = from_str(&line).map_err(|e| Error::InvalidRecord {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(Error::InvalidRecord {
                line: idx + 1,
                reason: "not a JSON object".to_string(),
            });
        }
        records.push(value);
    }
    Ok(records)
}
