use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ir::*;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::{route_to_name, sanitize_identifier};
use super::schema_resolver::SchemaResolver;

/// Transform a loaded OpenAPI document into the IR.
///
/// Expects parameter, request body and response references to be inlined
/// already (the loader does this). Never fails: constructs the builder has no
/// rule for degrade to `Unknown` with a warning.
pub fn transform(spec: &OpenApiSpec) -> IrSpec {
    let resolver = SchemaResolver::new(spec);

    // Phase 1: component schemas
    let schemas = resolve_schemas(spec, &resolver);

    // Phase 2: operations
    let operations = resolve_operations(spec, &resolver);

    // Phase 3: namespace index
    let namespaces = index_namespaces(&operations);

    // Phase 4: info and servers
    let info = IrInfo {
        title: spec.info.title.clone(),
        description: spec.info.description.clone(),
        version: spec.info.version.clone(),
    };
    let servers = spec
        .servers
        .iter()
        .map(|s| IrServer {
            url: s.url.clone(),
            description: s.description.clone(),
        })
        .collect();

    log::info!(
        "built IR: {} operation(s), {} schema(s), {} namespace(s)",
        operations.len(),
        schemas.len(),
        namespaces.len()
    );

    IrSpec {
        info,
        servers,
        schemas,
        operations,
        namespaces,
    }
}

fn resolve_schemas(spec: &OpenApiSpec, resolver: &SchemaResolver<'_>) -> Vec<IrSchema> {
    let Some(components) = &spec.components else {
        return Vec::new();
    };
    components
        .schemas
        .iter()
        .map(|(key, schema)| {
            let ir = resolver.ir_schema(key, schema);
            log::debug!("schema {key} -> {} ({})", ir.name, ir.kind.tag());
            ir
        })
        .collect()
}

fn resolve_operations(spec: &OpenApiSpec, resolver: &SchemaResolver<'_>) -> Vec<IrOperation> {
    let mut operations = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for (path, item) in &spec.paths {
        for (method, op) in item.operations() {
            let Some(method) = HttpMethod::parse(method) else {
                continue;
            };
            let ir = build_operation(method, path, item, op, resolver);

            let route = format!("{} {path}", method.as_str());
            if let Some(first) = seen.get(&ir.id) {
                log::warn!(
                    "operation id '{}' at {route} duplicates {first}; later generated members with this name are skipped",
                    ir.id
                );
            } else {
                seen.insert(ir.id.clone(), route);
            }
            operations.push(ir);
        }
    }
    operations
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    item: &PathItem,
    op: &Operation,
    resolver: &SchemaResolver<'_>,
) -> IrOperation {
    let raw_id = op
        .operation_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| route_to_name(method, path));
    let id = sanitize_identifier(&raw_id);
    let (namespace, entity) = derive_namespace(&op.tags, &raw_id);

    let parameters = merge_parameters(&item.parameters, &op.parameters)
        .into_iter()
        .map(|p| build_parameter(p, resolver))
        .collect();

    let request_body = match &op.request_body {
        Some(RequestBodyOrRef::RequestBody(body)) => {
            body.preferred_content().map(|(content_type, media)| IrRequestBody {
                required: body.required,
                schema: media
                    .schema
                    .as_ref()
                    .map(|s| resolver.schema_ref(s))
                    .unwrap_or(SchemaRef::Inline(IrType::Unknown)),
                content_type: content_type.clone(),
                description: body.description.clone(),
            })
        }
        Some(RequestBodyOrRef::Ref { ref_path }) => {
            log::warn!("request body {ref_path} on {id} was not inlined; ignoring it");
            None
        }
        None => None,
    };

    let mut responses = IndexMap::new();
    for (status, response) in &op.responses {
        let ir = match response {
            ResponseOrRef::Response(r) => IrResponse {
                description: r.description.clone(),
                schema: r
                    .preferred_content()
                    .and_then(|(_, media)| media.schema.as_ref())
                    .map(|s| resolver.schema_ref(s)),
            },
            ResponseOrRef::Ref { ref_path } => IrResponse {
                description: format!("unresolved {ref_path}"),
                schema: None,
            },
        };
        responses.insert(status.clone(), ir);
    }

    log::debug!(
        "{} {path} -> {id} (namespace '{namespace}', entity '{entity}')",
        method.as_str()
    );

    IrOperation {
        id,
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters,
        request_body,
        responses,
        namespace,
        entity,
        deprecated: op.deprecated.unwrap_or(false),
    }
}

/// Namespace and entity for an operation.
///
/// Tags win: the first tag is the namespace and the second (if any) the
/// entity. Otherwise an id like `users_getUser` yields `users` for both.
/// A single tag gives no entity; mutations under it invalidate every GET in
/// the namespace.
pub fn derive_namespace(tags: &[String], id: &str) -> (String, String) {
    if let Some(first) = tags.first() {
        let entity = tags.get(1).cloned().unwrap_or_default();
        return (first.clone(), entity);
    }
    match id.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => (prefix.to_string(), prefix.to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Path-level parameters followed by operation-level ones; an operation
/// parameter replaces a path-level one with the same name and location.
fn merge_parameters<'a>(
    shared: &'a [ParameterOrRef],
    own: &'a [ParameterOrRef],
) -> Vec<&'a Parameter> {
    let mut merged: Vec<&Parameter> = Vec::new();
    for param in shared.iter().chain(own) {
        let ParameterOrRef::Parameter(p) = param else {
            continue;
        };
        match merged
            .iter()
            .position(|existing| existing.name == p.name && existing.location == p.location)
        {
            Some(i) => merged[i] = p,
            None => merged.push(p),
        }
    }
    merged
}

fn build_parameter(param: &Parameter, resolver: &SchemaResolver<'_>) -> IrParameter {
    let location = match param.location {
        ParameterLocation::Path => IrParameterLocation::Path,
        ParameterLocation::Header => IrParameterLocation::Header,
        ParameterLocation::Body => IrParameterLocation::Body,
        ParameterLocation::Query | ParameterLocation::Cookie | ParameterLocation::Other => {
            IrParameterLocation::Query
        }
    };
    IrParameter {
        name: param.name.clone(),
        location,
        required: param.required || location == IrParameterLocation::Path,
        schema: param
            .schema
            .as_ref()
            .map(|s| resolver.ir_type(s))
            .unwrap_or(IrType::Unknown),
        description: param.description.clone(),
    }
}

fn index_namespaces(operations: &[IrOperation]) -> IndexMap<String, Vec<String>> {
    let mut index: IndexMap<String, Vec<String>> = IndexMap::new();
    for op in operations {
        if op.namespace.is_empty() {
            continue;
        }
        let entities = index.entry(op.namespace.clone()).or_default();
        if !op.entity.is_empty() && !entities.contains(&op.entity) {
            entities.push(op.entity.clone());
        }
    }
    index
}
