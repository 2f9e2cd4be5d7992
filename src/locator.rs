use crate::context::Context;
use crate::fields::FieldConfig;
use crate::path::FieldPath;
use serde_json::Value;

/// A configured prefix that resolves to an array for the record being expanded.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionPoint<'c, 'a> {
    pub path: &'c FieldPath,
    pub items: &'a [Value],
}

/// Configured prefixes that currently resolve to an array, shallowest first and in
/// declaration order within one depth. Prefixes already selected in `ctx` resolve to
/// their element and drop out; prefixes below an unselected array resolve to nothing
/// until that array is selected.
pub fn find_expansion_points<'c, 'a>(
    ctx: &Context<'a>,
    fields: &'c FieldConfig,
) -> Vec<ExpansionPoint<'c, 'a>> {
    fields
        .prefixes()
        .iter()
        .filter_map(|prefix| array_at(ctx, prefix))
        .collect()
}

/// The first point [`find_expansion_points`] would report, restricted to paths under
/// `within` when given.
pub fn first_expansion_point<'c, 'a>(
    ctx: &Context<'a>,
    fields: &'c FieldConfig,
    within: Option<&FieldPath>,
) -> Option<ExpansionPoint<'c, 'a>> {
    fields
        .prefixes()
        .iter()
        .filter(|prefix| within.is_none_or(|branch| prefix.starts_with(branch)))
        .find_map(|prefix| array_at(ctx, prefix))
}

fn array_at<'c, 'a>(ctx: &Context<'a>, prefix: &'c FieldPath) -> Option<ExpansionPoint<'c, 'a>> {
    match ctx.get(prefix) {
        Some(Value::Array(items)) => Some(ExpansionPoint {
            path: prefix,
            items,
        }),
        _ => None,
    }
}
