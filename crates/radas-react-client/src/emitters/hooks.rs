use std::collections::HashSet;

use minijinja::{Value, context};
use radas_core::ir::grouping::{
    OperationGroup, RelatedOperationMatcher, group_by_namespace, has_related_get_operation,
    related_get_operation, related_list_operation, should_invalidate,
};
use radas_core::ir::{HttpMethod, IrOperation, IrParameterLocation, IrSpec};
use radas_core::transform::name_normalizer::{capitalize, hook_name};

use super::{is_identifier, js_string, operation_doc_lines, params_optional};

/// Context for `queries.ts`: React Query hooks grouped by namespace.
pub fn hooks_context(ir: &IrSpec, matcher: &dyn RelatedOperationMatcher) -> Value {
    let mut hook_names = HashSet::new();
    let mut optimistic_names = HashSet::new();

    let groups: Vec<Value> = group_by_namespace(&ir.operations)
        .iter()
        .filter_map(|group| {
            let hooks: Vec<Value> = group
                .operations
                .iter()
                .filter(|op| hook_names.insert(hook_name(&op.id).to_lowercase()))
                .map(|op| hook_context(op, group, matcher, &mut optimistic_names))
                .collect();
            if hooks.is_empty() {
                return None;
            }
            Some(context! {
                title => format!("{} Hooks", capitalize(&group.name)),
                hooks => hooks,
            })
        })
        .collect();

    context! { groups => groups }
}

fn hook_context(
    op: &IrOperation,
    group: &OperationGroup<'_>,
    matcher: &dyn RelatedOperationMatcher,
    optimistic_names: &mut HashSet<String>,
) -> Value {
    let name = hook_name(&op.id);

    if !should_invalidate(op) {
        return context! {
            kind => "query",
            name => name,
            id => op.id.clone(),
            doc_lines => operation_doc_lines(op),
            has_params => op.has_params(),
            params_optional => params_optional(op),
        };
    }

    let invalidate = invalidation_keys(op, &group.operations);
    let optimistic_name = format!("{name}Optimistic");
    let optimistic = if has_related_get_operation(op, &group.operations)
        && optimistic_names.insert(optimistic_name.to_lowercase())
    {
        optimistic_context(op, optimistic_name, &group.operations, matcher)
    } else {
        None
    };

    context! {
        kind => "mutation",
        name => name,
        id => op.id.clone(),
        doc_lines => operation_doc_lines(op),
        has_params => op.has_params(),
        invalidate => invalidate,
        optimistic => optimistic,
    }
}

/// Query keys refreshed after a successful mutation: GETs in the group
/// sharing the entity, or every GET in the group when there is none.
fn invalidation_keys(op: &IrOperation, operations: &[&IrOperation]) -> Vec<String> {
    let mut seen = HashSet::new();
    operations
        .iter()
        .filter(|other| other.method == HttpMethod::Get)
        .filter(|other| op.entity.is_empty() || other.entity == op.entity)
        .filter(|other| seen.insert(other.id.as_str()))
        .map(|other| js_string(&other.id))
        .collect()
}

fn optimistic_context(
    op: &IrOperation,
    name: String,
    operations: &[&IrOperation],
    matcher: &dyn RelatedOperationMatcher,
) -> Option<Value> {
    let item = related_get_operation(op, operations, matcher);
    let list = related_list_operation(op, operations, matcher).or(item)?;

    let optional = params_optional(op);
    let id_access = id_parameter(op).map(|p| variable_access(p, optional));
    let body_access = op
        .request_body
        .as_ref()
        .map(|_| variable_access("body", optional));

    let apply = match (op.method, &id_access, &body_access) {
        (HttpMethod::Delete, Some(_), _) => "remove",
        (HttpMethod::Post, _, Some(_)) => "append",
        (HttpMethod::Put | HttpMethod::Patch, Some(_), Some(_)) => "merge",
        _ => "none",
    };
    let item_key = match op.method {
        HttpMethod::Put | HttpMethod::Patch => item.map(|get| js_string(&get.id)),
        _ => None,
    };

    Some(context! {
        name => name,
        list_key => js_string(&list.id),
        item_key => item_key,
        apply => apply,
        id_access => id_access,
        body_access => body_access,
    })
}

/// The parameter identifying the affected item: one named `id`, else the
/// last path parameter.
fn id_parameter(op: &IrOperation) -> Option<&str> {
    op.parameters
        .iter()
        .find(|p| p.name == "id")
        .or_else(|| op.parameters_in(IrParameterLocation::Path).last())
        .map(|p| p.name.as_str())
}

fn variable_access(name: &str, optional: bool) -> String {
    match (is_identifier(name), optional) {
        (true, false) => format!("variables.{name}"),
        (true, true) => format!("variables?.{name}"),
        (false, false) => format!("variables[{}]", js_string(name)),
        (false, true) => format!("variables?.[{}]", js_string(name)),
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use radas_core::ir::{IrParameter, IrType};

    use super::*;

    fn op(id: &str, method: HttpMethod, path: &str, entity: &str) -> IrOperation {
        IrOperation {
            id: id.into(),
            method,
            path: path.into(),
            summary: None,
            description: None,
            tags: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
            namespace: "orders".into(),
            entity: entity.into(),
            deprecated: false,
        }
    }

    fn path_param(name: &str) -> IrParameter {
        IrParameter {
            name: name.into(),
            location: IrParameterLocation::Path,
            required: true,
            schema: IrType::string(),
            description: None,
        }
    }

    #[test]
    fn invalidation_falls_back_to_all_gets_without_entity() {
        let list = op("listOrders", HttpMethod::Get, "/orders", "Order");
        let other = op("listUsers", HttpMethod::Get, "/users", "User");
        let create = op("createOrder", HttpMethod::Post, "/orders", "Order");
        let anonymous = op("ping", HttpMethod::Post, "/ping", "");
        let ops = [&list, &other, &create, &anonymous];

        assert_eq!(invalidation_keys(&create, &ops), vec!["'listOrders'"]);
        assert_eq!(
            invalidation_keys(&anonymous, &ops),
            vec!["'listOrders'", "'listUsers'"]
        );
    }

    #[test]
    fn id_parameter_prefers_id_then_last_path_param() {
        let mut remove = op(
            "removeLine",
            HttpMethod::Delete,
            "/orders/{orderId}/lines/{lineId}",
            "Order",
        );
        remove.parameters = vec![path_param("orderId"), path_param("lineId")];
        assert_eq!(id_parameter(&remove), Some("lineId"));

        remove.parameters.push(IrParameter {
            location: IrParameterLocation::Query,
            ..path_param("id")
        });
        assert_eq!(id_parameter(&remove), Some("id"));
    }

    #[test]
    fn variable_access_handles_optional_and_quoted_names() {
        assert_eq!(variable_access("id", false), "variables.id");
        assert_eq!(variable_access("body", true), "variables?.body");
        assert_eq!(variable_access("order-id", true), "variables?.['order-id']");
    }
}
