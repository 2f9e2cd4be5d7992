//! Folds compatible rows of a group together so each group uses as few lines as possible.

use crate::row::Row;
use tracing::trace;

/// Merges rows group by group. A row with a group key value joins that value's group;
/// a row whose key is blank stays with the group of the last keyed row before it.
/// Groups keep the order in which their key first appeared, and rows left with no
/// value at all are dropped.
pub fn merge(rows: Vec<Row>, group_key: usize) -> Vec<Row> {
    let mut groups: Vec<(String, Vec<Row>)> = Vec::new();
    let mut current: Option<usize> = None;
    for row in rows {
        let key = row.get(group_key);
        if !key.is_empty() {
            current = Some(match groups.iter().position(|(k, _)| k == key) {
                Some(pos) => pos,
                None => {
                    groups.push((key.to_string(), Vec::new()));
                    groups.len() - 1
                }
            });
        }
        let pos = match current {
            Some(pos) => pos,
            None => {
                groups.push((String::new(), Vec::new()));
                let pos = groups.len() - 1;
                current = Some(pos);
                pos
            }
        };
        groups[pos].1.push(row);
    }

    groups
        .into_iter()
        .flat_map(|(_, group)| merge_group(group))
        .collect()
}

/// First-fit: each unconsumed row absorbs every later unconsumed row that does not
/// disagree with it on any non-empty field. A value the absorbing row already shows is
/// not repeated.
pub fn merge_group(rows: Vec<Row>) -> Vec<Row> {
    let mut pending: Vec<Option<Row>> = rows.into_iter().map(Some).collect();
    let mut merged = Vec::new();

    for i in 0..pending.len() {
        let Some(mut acc) = pending[i].take() else {
            continue;
        };
        for (offset, slot) in pending[i + 1..].iter_mut().enumerate() {
            let Some(candidate) = slot.as_ref() else {
                continue;
            };
            if conflicts(&acc, candidate) {
                continue;
            }
            absorb(&mut acc, candidate);
            trace!(into = i, from = i + 1 + offset, "merged row");
            *slot = None;
        }
        if !acc.is_empty() {
            merged.push(acc);
        }
    }
    merged
}

fn conflicts(a: &Row, b: &Row) -> bool {
    (0..a.width()).any(|i| !a.is_blank(i) && !b.is_blank(i) && a.get(i) != b.get(i))
}

fn absorb(acc: &mut Row, other: &Row) {
    for i in 0..acc.width() {
        if acc.is_blank(i) && !other.is_blank(i) {
            acc.take_cell(other, i);
        }
    }
}
