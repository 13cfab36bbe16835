use indexmap::IndexMap;

use super::operations::{HttpMethod, IrOperation};

/// Group name used for operations without a namespace.
pub const DEFAULT_GROUP: &str = "api";

/// Operations sharing a namespace, in document order.
#[derive(Debug, Clone)]
pub struct OperationGroup<'a> {
    pub name: String,
    pub operations: Vec<&'a IrOperation>,
}

/// Partition operations by namespace, preserving first-seen order of both
/// groups and members. Empty namespaces coalesce into [`DEFAULT_GROUP`].
pub fn group_by_namespace(operations: &[IrOperation]) -> Vec<OperationGroup<'_>> {
    let mut groups: IndexMap<&str, Vec<&IrOperation>> = IndexMap::new();
    for op in operations {
        let name = if op.namespace.is_empty() {
            DEFAULT_GROUP
        } else {
            op.namespace.as_str()
        };
        groups.entry(name).or_default().push(op);
    }

    groups
        .into_iter()
        .map(|(name, operations)| OperationGroup {
            name: name.to_string(),
            operations,
        })
        .collect()
}

/// Whether a successful call should invalidate cached queries.
pub fn should_invalidate(op: &IrOperation) -> bool {
    op.method.is_mutation()
}

/// Decides which GET paths address a single item rather than a collection.
pub trait RelatedOperationMatcher {
    fn is_item_path(&self, path: &str) -> bool;
}

/// Treats a path whose last segment is a `{param}` placeholder as an item
/// path: `/orders/{id}` is an item, `/orders` and `/orders/{id}/lines` are
/// collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingParamMatcher;

impl RelatedOperationMatcher for TrailingParamMatcher {
    fn is_item_path(&self, path: &str) -> bool {
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.starts_with('{') && segment.ends_with('}'))
    }
}

fn same_entity_gets<'a, 'b>(
    op: &'b IrOperation,
    operations: &'b [&'a IrOperation],
) -> impl Iterator<Item = &'a IrOperation> + 'b {
    operations.iter().copied().filter(move |other| {
        other.method == HttpMethod::Get && other.entity == op.entity && other.id != op.id
    })
}

/// True when `op` has an entity and another GET operation shares it.
pub fn has_related_get_operation(op: &IrOperation, operations: &[&IrOperation]) -> bool {
    !op.entity.is_empty() && same_entity_gets(op, operations).next().is_some()
}

/// The first same-entity GET addressing a collection.
pub fn related_list_operation<'a>(
    op: &IrOperation,
    operations: &[&'a IrOperation],
    matcher: &dyn RelatedOperationMatcher,
) -> Option<&'a IrOperation> {
    if op.entity.is_empty() {
        return None;
    }
    same_entity_gets(op, operations).find(|other| !matcher.is_item_path(&other.path))
}

/// The first same-entity GET addressing a single item.
pub fn related_get_operation<'a>(
    op: &IrOperation,
    operations: &[&'a IrOperation],
    matcher: &dyn RelatedOperationMatcher,
) -> Option<&'a IrOperation> {
    if op.entity.is_empty() {
        return None;
    }
    same_entity_gets(op, operations).find(|other| matcher.is_item_path(&other.path))
}
