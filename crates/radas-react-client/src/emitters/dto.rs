use minijinja::{Value, context};
use radas_core::ir::{IrSchema, IrSpec, SchemaKind};

use super::{doc_lines, js_string, property_key, unique_schemas};
use crate::type_mapper::{Scope, TypeMapper};

/// Context for `dto.ts`: one declaration per unique schema.
pub fn dto_context(ir: &IrSpec, mapper: &TypeMapper) -> Value {
    let schemas: Vec<Value> = unique_schemas(ir)
        .into_iter()
        .map(|schema| schema_context(schema, mapper))
        .collect();
    context! { schemas => schemas }
}

fn schema_context(schema: &IrSchema, mapper: &TypeMapper) -> Value {
    let properties: Vec<Value> = schema
        .sorted_properties()
        .into_iter()
        .map(|(name, prop)| {
            context! {
                key => property_key(name),
                annotation => mapper.annotation(&prop.ty, Scope::Dto),
                optional => !schema.is_required(name),
                doc_lines => doc_lines(prop.description.as_deref()),
            }
        })
        .collect();

    let (union, alias) = match &schema.kind {
        SchemaKind::Object => (None, None),
        SchemaKind::Enum(values) => (
            Some(
                values
                    .iter()
                    .map(|v| js_string(v))
                    .collect::<Vec<_>>()
                    .join(" | "),
            ),
            None,
        ),
        SchemaKind::Alias(ty) => (None, Some(mapper.annotation(ty, Scope::Dto))),
    };

    context! {
        name => schema.name.clone(),
        kind => schema.kind.tag(),
        doc_lines => doc_lines(schema.description.as_deref()),
        properties => properties,
        union => union,
        alias => alias,
    }
}
