//! Enumerates every combination of array-element selections for one record.

use crate::context::{Context, Selection};
use crate::error::{Error, Result};
use crate::fields::FieldConfig;
use crate::locator::{find_expansion_points, first_expansion_point};
use crate::path::FieldPath;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How arrays that do not contain one another are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingMode {
    /// Every element of one array meets every element of the others.
    #[default]
    Cartesian,
    /// Element `i` of each array shares row `i`; shorter arrays leave their columns empty.
    /// Arrays nested inside one branch are still fully enumerated.
    Zip,
}

pub struct Expander<'c> {
    fields: &'c FieldConfig,
    mode: SiblingMode,
    max_depth: usize,
}

impl<'c> Expander<'c> {
    pub fn new(fields: &'c FieldConfig) -> Self {
        Self {
            fields,
            mode: SiblingMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_mode(mut self, mode: SiblingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns at least one context; a record without arrays yields the empty one.
    pub fn expand<'a>(&self, record: &'a Value) -> Result<Vec<Context<'a>>> {
        let mut ctx = Context::root(record);
        let mut out = Vec::new();
        match self.mode {
            SiblingMode::Cartesian => self.cartesian(&mut ctx, None, &mut out)?,
            SiblingMode::Zip => self.zip(&ctx, &mut out)?,
        }
        Ok(out)
    }

    fn cartesian<'a>(
        &self,
        ctx: &mut Context<'a>,
        within: Option<&FieldPath>,
        out: &mut Vec<Context<'a>>,
    ) -> Result<()> {
        let Some(point) = first_expansion_point(ctx, self.fields, within) else {
            trace!(selections = ctx.selections().len(), "emitting context");
            out.push(ctx.clone());
            return Ok(());
        };
        self.check_depth(ctx, point.path)?;

        let base = ctx.selections().len();
        if point.items.is_empty() {
            ctx.push(absent(point.path));
            self.cartesian(ctx, within, out)?;
            ctx.truncate(base);
            return Ok(());
        }
        for (index, item) in point.items.iter().enumerate() {
            ctx.push(Selection {
                path: point.path.clone(),
                index: Some(index),
                element: Some(item),
            });
            self.cartesian(ctx, within, out)?;
            ctx.truncate(base);
        }
        Ok(())
    }

    fn zip<'a>(&self, ctx: &Context<'a>, out: &mut Vec<Context<'a>>) -> Result<()> {
        let points = find_expansion_points(ctx, self.fields);
        if points.is_empty() {
            out.push(ctx.clone());
            return Ok(());
        }

        let base = ctx.selections().len();
        let mut branches: Vec<(&FieldPath, Vec<Vec<Selection<'a>>>)> = Vec::new();
        for point in points {
            let mut local = Vec::new();
            self.cartesian(&mut ctx.clone(), Some(point.path), &mut local)?;
            let chains = local
                .into_iter()
                .map(|c| c.selections()[base..].to_vec())
                .collect();
            branches.push((point.path, chains));
        }

        let rows = branches.iter().map(|(_, chains)| chains.len()).max().unwrap_or(1);
        for i in 0..rows {
            let mut row = ctx.clone();
            for (path, chains) in &branches {
                match chains.get(i) {
                    Some(chain) => chain.iter().cloned().for_each(|sel| row.push(sel)),
                    None => row.push(absent(path)),
                }
            }
            trace!(row = i, selections = row.selections().len(), "emitting zipped context");
            out.push(row);
        }
        Ok(())
    }

    fn check_depth(&self, ctx: &Context<'_>, path: &FieldPath) -> Result<()> {
        if ctx.selections().len() >= self.max_depth {
            return Err(Error::NestingTooDeep {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}

fn absent<'a>(path: &FieldPath) -> Selection<'a> {
    Selection {
        path: path.clone(),
        index: None,
        element: None,
    }
}

/// Cartesian expansion with the default depth limit.
pub fn expand<'a>(record: &'a Value, fields: &FieldConfig) -> Result<Vec<Context<'a>>> {
    Expander::new(fields).expand(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(paths: &[&str]) -> FieldConfig {
        FieldConfig::new(paths).unwrap()
    }

    fn value_of(ctx: &Context<'_>, field: &str) -> Option<Value> {
        ctx.field_value(&FieldPath::parse(field).unwrap()).cloned()
    }

    #[test]
    fn test_no_arrays_gives_single_empty_context() {
        let config = fields(&["incidentId", "location.road"]);
        let record = json!({"incidentId": "I1", "location": {"road": "I-5"}});
        let contexts = expand(&record, &config).unwrap();
        assert_eq!(contexts.len(), 1);
        assert!(contexts[0].selections().is_empty());
    }

    #[test]
    fn test_independent_arrays_multiply() {
        let config = fields(&["vehicles.type", "advisories.type", "tags.name"]);
        let record = json!({
            "vehicles": [{"type": "car"}, {"type": "bus"}],
            "advisories": [{"type": "a"}, {"type": "b"}, {"type": "c"}],
            "tags": [{"name": "x"}, {"name": "y"}]
        });
        let contexts = expand(&record, &config).unwrap();
        assert_eq!(contexts.len(), 12);

        let mut seen: Vec<(Value, Value, Value)> = contexts
            .iter()
            .map(|c| {
                (
                    value_of(c, "vehicles.type").unwrap(),
                    value_of(c, "advisories.type").unwrap(),
                    value_of(c, "tags.name").unwrap(),
                )
            })
            .collect();
        seen.sort_by_key(|t| format!("{:?}", t));
        seen.dedup();
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_nested_arrays_follow_each_branch() {
        let config = fields(&["responders.agency", "responders.personnel.name"]);
        let record = json!({
            "responders": [
                {"agency": "A", "personnel": [{"name": "Bob"}, {"name": "Sue"}]},
                {"agency": "B", "personnel": [{"name": "Bob"}]}
            ]
        });
        let contexts = expand(&record, &config).unwrap();
        let pairs: Vec<(Value, Value)> = contexts
            .iter()
            .map(|c| {
                (
                    value_of(c, "responders.agency").unwrap(),
                    value_of(c, "responders.personnel.name").unwrap(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                (json!("A"), json!("Bob")),
                (json!("A"), json!("Sue")),
                (json!("B"), json!("Bob")),
            ]
        );
    }

    #[test]
    fn test_empty_array_keeps_sibling_branches() {
        let config = fields(&["vehicles.type", "advisories.type"]);
        let record = json!({"vehicles": [], "advisories": [{"type": "a"}, {"type": "b"}]});
        let contexts = expand(&record, &config).unwrap();
        assert_eq!(contexts.len(), 2);
        assert!(contexts.iter().all(|c| value_of(c, "vehicles.type").is_none()));
    }

    #[test]
    fn test_zip_pairs_siblings_by_position() {
        let config = fields(&["vehicles.type", "responders.agency", "responders.personnel.name"]);
        let record = json!({
            "vehicles": [{"type": "car"}],
            "responders": [
                {"agency": "A", "personnel": [{"name": "Bob"}, {"name": "Sue"}]},
                {"agency": "B", "personnel": [{"name": "Tim"}]}
            ]
        });
        let contexts = Expander::new(&config)
            .with_mode(SiblingMode::Zip)
            .expand(&record)
            .unwrap();
        assert_eq!(contexts.len(), 3);
        assert_eq!(value_of(&contexts[0], "vehicles.type"), Some(json!("car")));
        assert_eq!(value_of(&contexts[1], "vehicles.type"), None);
        assert_eq!(value_of(&contexts[1], "responders.personnel.name"), Some(json!("Sue")));
        assert_eq!(value_of(&contexts[2], "responders.agency"), Some(json!("B")));
    }

    #[test]
    fn test_depth_limit_is_enforced() {
        let config = fields(&["a.b.c"]);
        let record = json!({"a": [{"b": [{"c": 1}]}]});
        let err = Expander::new(&config)
            .with_max_depth(1)
            .expand(&record)
            .unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { limit: 1, .. }));
    }
}
