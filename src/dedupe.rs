//! Blanks values that were already shown for the same owner within a group.

use crate::context::OwnerKey;
use crate::row::Row;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Seen values keyed by (owner, column). Cleared whenever the group key changes, so
/// nothing leaks from one group into the next.
#[derive(Debug, Default)]
pub struct Deduplicator {
    group_key: usize,
    group: Option<String>,
    seen: HashMap<(OwnerKey, usize), HashSet<String>>,
}

impl Deduplicator {
    pub fn new(group_key: usize) -> Self {
        Self {
            group_key,
            ..Default::default()
        }
    }

    /// Blanks every value of `row` already seen under the same owner and column.
    /// Returns how many cells were blanked.
    pub fn apply(&mut self, row: &mut Row) -> usize {
        let key = row.get(self.group_key);
        // blank keys continue the current group: later rows have had theirs blanked
        if !key.is_empty() && self.group.as_deref() != Some(key) {
            self.group = Some(key.to_string());
            self.seen.clear();
        }

        let mut blanked = 0;
        for index in 0..row.width() {
            if row.is_blank(index) {
                continue;
            }
            let owner = row.owner(index).cloned().unwrap_or_default();
            let seen = self.seen.entry((owner, index)).or_default();
            if !seen.insert(row.get(index).to_string()) {
                trace!(column = index, value = row.get(index), "blanking repeated value");
                row.blank(index);
                blanked += 1;
            }
        }
        blanked
    }
}

/// Deduplicates rows in order, resetting whenever a new group key value appears.
pub fn dedupe(mut rows: Vec<Row>, group_key: usize) -> Vec<Row> {
    let mut dedup = Deduplicator::new(group_key);
    for row in &mut rows {
        dedup.apply(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand;
    use crate::fields::FieldConfig;
    use crate::row::{build_row, DEFAULT_LIST_SEPARATOR};
    use serde_json::{json, Value};

    fn built_rows(record: &Value, fields: &FieldConfig) -> Vec<Row> {
        expand(record, fields)
            .unwrap()
            .iter()
            .map(|ctx| build_row(ctx, fields, DEFAULT_LIST_SEPARATOR))
            .collect()
    }

    fn values(rows: &[Row]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.values().iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_repeats_are_blanked_per_owner() {
        let fields = FieldConfig::new([
            "incidentId",
            "responders.agency",
            "responders.personnel.name",
        ])
        .unwrap();
        let record = json!({
            "incidentId": "I1",
            "responders": [
                {"agency": "A", "personnel": [{"name": "Bob"}, {"name": "Sue"}]},
                {"agency": "B", "personnel": [{"name": "Bob"}]}
            ]
        });
        let rows = dedupe(built_rows(&record, &fields), 0);
        assert_eq!(
            values(&rows),
            vec![
                vec!["I1", "A", "Bob"],
                vec!["", "", "Sue"],
                vec!["", "B", "Bob"],
            ]
        );
    }

    #[test]
    fn test_same_agency_text_under_different_responders_survives() {
        let fields = FieldConfig::new(["incidentId", "responders.agency"]).unwrap();
        let record = json!({
            "incidentId": "I2",
            "responders": [{"agency": "Fire"}, {"agency": "Fire"}]
        });
        let rows = dedupe(built_rows(&record, &fields), 0);
        assert_eq!(values(&rows), vec![vec!["I2", "Fire"], vec!["", "Fire"]]);
    }

    #[test]
    fn test_cross_product_repeats_are_blanked() {
        let fields = FieldConfig::new(["incidentId", "vehicles.type", "advisories.type"]).unwrap();
        let record = json!({
            "incidentId": "I3",
            "vehicles": [{"type": "car"}, {"type": "bus"}],
            "advisories": [{"type": "closure"}]
        });
        let rows = dedupe(built_rows(&record, &fields), 0);
        assert_eq!(
            values(&rows),
            vec![vec!["I3", "car", "closure"], vec!["", "bus", ""]]
        );
    }

    #[test]
    fn test_new_group_resets_state() {
        let rows = vec![
            Row::new(vec!["I1".into(), "open".into()]),
            Row::new(vec!["I1".into(), "open".into()]),
            Row::new(vec!["I2".into(), "open".into()]),
            Row::new(vec!["".into(), "open".into()]),
        ];
        let rows = dedupe(rows, 0);
        assert_eq!(
            values(&rows),
            vec![
                vec!["I1", "open"],
                vec!["", ""],
                vec!["I2", "open"],
                vec!["", ""],
            ]
        );
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let fields = FieldConfig::new([
            "incidentId",
            "vehicles.type",
            "responders.agency",
            "responders.personnel.name",
        ])
        .unwrap();
        let record = json!({
            "incidentId": "I4",
            "vehicles": [{"type": "car"}, {"type": "car"}],
            "responders": [{"agency": "A", "personnel": [{"name": "Bob"}, {"name": "Bob"}]}]
        });
        let once = dedupe(built_rows(&record, &fields), 0);
        let twice = dedupe(once.clone(), 0);
        assert_eq!(once, twice);
    }
}
