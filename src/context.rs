//! One concrete combination of array-element selections for a record.

use crate::path::{self, FieldPath};
use serde_json::Value;
use std::fmt;

/// The element chosen at one expansion point. `element` is `None` when the array was
/// empty (or shorter than its zip partners), which makes everything beneath it resolve
/// to nothing.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub path: FieldPath,
    pub index: Option<usize>,
    pub element: Option<&'a Value>,
}

/// A record seen through a chain of selections. Looking a path up through a context
/// behaves as if every selected array had been replaced in a copy of the record by its
/// chosen element, without copying anything.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    record: &'a Value,
    selections: Vec<Selection<'a>>,
}

impl<'a> Context<'a> {
    pub fn root(record: &'a Value) -> Self {
        Self {
            record,
            selections: Vec::new(),
        }
    }

    pub fn record(&self) -> &'a Value {
        self.record
    }

    pub fn selections(&self) -> &[Selection<'a>] {
        &self.selections
    }

    pub(crate) fn push(&mut self, selection: Selection<'a>) {
        self.selections.push(selection);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.selections.truncate(len);
    }

    /// Resolves `path` against the substituted record: a selection at `path` itself
    /// yields the chosen element rather than the array.
    pub fn get(&self, path: &FieldPath) -> Option<&'a Value> {
        self.resolve(path, |sel| path.starts_with(&sel.path))
    }

    /// Resolves a configured field: only selections strictly above the field apply.
    pub fn field_value(&self, field: &FieldPath) -> Option<&'a Value> {
        self.resolve(field, |sel| sel.path.is_strict_prefix_of(field))
    }

    fn resolve(&self, path: &FieldPath, applies: impl Fn(&Selection<'a>) -> bool) -> Option<&'a Value> {
        match self.deepest(applies) {
            Some(pos) => {
                let sel = &self.selections[pos];
                let suffix = path.suffix_after(&sel.path)?;
                sel.element.and_then(|element| path::get(element, suffix))
            }
            None => path::get(self.record, path.segments()),
        }
    }

    /// Position of the deepest matching selection; the latest one wins a tie.
    fn deepest(&self, applies: impl Fn(&Selection<'a>) -> bool) -> Option<usize> {
        self.selections
            .iter()
            .enumerate()
            .filter(|(_, sel)| applies(sel))
            .max_by_key(|(_, sel)| sel.path.depth())
            .map(|(pos, _)| pos)
    }

    /// Identity of the array element that owns `field` in this combination: the chain of
    /// selections leading to the deepest expansion point above the field. Fields outside
    /// every array share the root owner.
    pub fn owner_of(&self, field: &FieldPath) -> OwnerKey {
        let Some(pos) = self.deepest(|sel| sel.path.is_strict_prefix_of(field)) else {
            return OwnerKey::root();
        };
        let owner = &self.selections[pos].path;
        OwnerKey(
            self.selections[..=pos]
                .iter()
                .filter(|sel| owner.starts_with(&sel.path))
                .map(|sel| (sel.path.to_string(), sel.index))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OwnerKey(Vec<(String, Option<usize>)>);

impl OwnerKey {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("root");
        }
        for (i, (path, index)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            match index {
                Some(index) => write!(f, "{}[{}]", path, index)?,
                None => write!(f, "{}[-]", path)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    fn select<'a>(ctx: &mut Context<'a>, path: &str, index: usize) {
        let array = ctx.get(&p(path)).and_then(Value::as_array).unwrap();
        ctx.push(Selection {
            path: p(path),
            index: Some(index),
            element: array.get(index),
        });
    }

    #[test]
    fn test_lookup_through_selections() {
        let record = json!({
            "incidentId": "I1",
            "responders": [
                {"agency": "A", "personnel": [{"name": "Bob"}, {"name": "Sue"}]},
                {"agency": "B", "personnel": [{"name": "Tim"}]}
            ]
        });
        let mut ctx = Context::root(&record);
        assert!(ctx.get(&p("responders")).unwrap().is_array());

        select(&mut ctx, "responders", 0);
        select(&mut ctx, "responders.personnel", 1);

        assert_eq!(ctx.field_value(&p("incidentId")), Some(&json!("I1")));
        assert_eq!(ctx.field_value(&p("responders.agency")), Some(&json!("A")));
        assert_eq!(ctx.field_value(&p("responders.personnel.name")), Some(&json!("Sue")));
        assert!(ctx.get(&p("responders")).unwrap().is_object());
    }

    #[test]
    fn test_absent_selection_hides_subtree() {
        let record = json!({"advisories": []});
        let mut ctx = Context::root(&record);
        ctx.push(Selection {
            path: p("advisories"),
            index: None,
            element: None,
        });
        assert_eq!(ctx.get(&p("advisories")), None);
        assert_eq!(ctx.field_value(&p("advisories.type")), None);
    }

    #[test]
    fn test_owner_is_the_selected_instance() {
        let record = json!({
            "responders": [
                {"agency": "A", "personnel": [{"name": "Bob"}]},
                {"agency": "B", "personnel": [{"name": "Bob"}]}
            ]
        });
        let mut first = Context::root(&record);
        select(&mut first, "responders", 0);
        select(&mut first, "responders.personnel", 0);
        let mut second = Context::root(&record);
        select(&mut second, "responders", 1);
        select(&mut second, "responders.personnel", 0);

        let name = p("responders.personnel.name");
        assert_ne!(first.owner_of(&name), second.owner_of(&name));
        assert_eq!(
            first.owner_of(&p("responders.agency")).to_string(),
            "responders[0]"
        );
        assert_eq!(
            second.owner_of(&name).to_string(),
            "responders[1] > responders.personnel[0]"
        );
        assert!(first.owner_of(&p("incidentId")).is_root());
    }
}
