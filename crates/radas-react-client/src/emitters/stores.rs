use std::collections::HashSet;

use minijinja::{Value, context};
use radas_core::ir::grouping::group_by_namespace;
use radas_core::ir::{HttpMethod, IrOperation, IrSpec};
use radas_core::transform::name_normalizer::{action_name, capitalize, store_name};

/// State members every store declares before its actions.
const RESERVED_MEMBERS: [&str; 4] = ["data", "loading", "error", "reset"];

/// Context for `stores.ts`: one zustand store per namespace.
pub fn stores_context(ir: &IrSpec) -> Value {
    let mut store_names = HashSet::new();
    let stores: Vec<Value> = group_by_namespace(&ir.operations)
        .iter()
        .filter_map(|group| {
            let name = store_name(&group.name);
            if !store_names.insert(name.clone()) {
                log::warn!(
                    "namespace {} also maps to store {name}; skipping it",
                    group.name
                );
                return None;
            }
            let state_type = format!("{}State", name.strip_prefix("use").unwrap_or(&name));

            let mut members: HashSet<String> =
                RESERVED_MEMBERS.iter().map(|m| m.to_string()).collect();
            let actions: Vec<Value> = group
                .operations
                .iter()
                .filter_map(|op| {
                    let action = store_action_name(op);
                    if !members.insert(action.clone()) {
                        log::debug!("{name}: action {action} already defined; skipping {}", op.id);
                        return None;
                    }
                    Some(context! {
                        name => action,
                        id => op.id.clone(),
                    })
                })
                .collect();

            Some(context! {
                name => name,
                state_type => state_type,
                actions => actions,
            })
        })
        .collect();

    context! { stores => stores }
}

/// `fetch<Id>` for reads, the verb-prefixed action name for writes.
pub fn store_action_name(op: &IrOperation) -> String {
    match op.method {
        HttpMethod::Get => format!("fetch{}", capitalize(&op.id)),
        method => action_name(method, &op.id),
    }
}
