//! Dot-separated field paths and tolerant lookups into nested JSON values.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;

/// A non-empty sequence of object keys, written `a.b.c` in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    dotted: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(dotted: &str) -> Result<Self> {
        let dotted = dotted.trim();
        if dotted.is_empty() {
            return Err(Error::EmptyFieldPath { index: 0 });
        }
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::EmptySegment {
                path: dotted.to_string(),
            });
        }
        Ok(Self {
            dotted: dotted.to_string(),
            segments,
        })
    }

    fn from_segments(segments: &[String]) -> Self {
        Self {
            dotted: segments.join("."),
            segments: segments.to_vec(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Every proper prefix, shallowest first: `a.b.c` yields `a` and `a.b`.
    pub fn strict_prefixes(&self) -> impl Iterator<Item = FieldPath> + '_ {
        (1..self.segments.len()).map(|n| Self::from_segments(&self.segments[..n]))
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    pub fn is_strict_prefix_of(&self, other: &FieldPath) -> bool {
        self.depth() < other.depth() && other.starts_with(self)
    }

    /// Segments left after removing `prefix`, or `None` when `prefix` does not lead here.
    pub fn suffix_after(&self, prefix: &FieldPath) -> Option<&[String]> {
        self.starts_with(prefix)
            .then(|| &self.segments[prefix.depth()..])
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

/// Walks `segments` through nested objects. Anything that is not an object along the
/// way (missing key, `null`, scalar, array) ends the walk with `None`.
pub fn get<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        _ => None,
    })
}

/// Stores `new_value` at `segments`, creating (or replacing non-object) intermediates.
pub fn set(value: &mut Value, segments: &[String], new_value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *value = new_value;
        return;
    };

    let mut current = value;
    for key in parents {
        current = object_mut(current)
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    object_mut(current).insert(last.clone(), new_value);
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(matches!(FieldPath::parse(""), Err(Error::EmptyFieldPath { .. })));
        assert!(matches!(
            FieldPath::parse("a..b"),
            Err(Error::EmptySegment { .. })
        ));
        assert_eq!(p("location.road").depth(), 2);
    }

    #[test]
    fn test_get_tolerates_missing_intermediates() {
        let record = json!({"location": {"road": "I-5"}, "details": null, "tags": ["a"]});
        assert_eq!(get(&record, p("location.road").segments()), Some(&json!("I-5")));
        assert_eq!(get(&record, p("location.exit.number").segments()), None);
        assert_eq!(get(&record, p("details.casualties").segments()), None);
        assert_eq!(get(&record, p("tags.name").segments()), None);
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut value = json!({"location": "unknown"});
        set(&mut value, p("location.road").segments(), json!("I-5"));
        set(&mut value, p("details.vehicles.type").segments(), json!("car"));
        assert_eq!(
            value,
            json!({"location": {"road": "I-5"}, "details": {"vehicles": {"type": "car"}}})
        );
    }

    #[test]
    fn test_prefix_relations() {
        let field = p("responders.personnel.name");
        let prefixes: Vec<String> = field.strict_prefixes().map(|f| f.to_string()).collect();
        assert_eq!(prefixes, vec!["responders", "responders.personnel"]);
        assert!(p("responders").is_strict_prefix_of(&field));
        assert!(!field.is_strict_prefix_of(&field));
        assert!(!p("resp").is_strict_prefix_of(&field));
        assert_eq!(
            field.suffix_after(&p("responders")),
            Some(&["personnel".to_string(), "name".to_string()][..])
        );
    }
}
