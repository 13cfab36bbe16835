use minijinja::{Value, context};
use radas_core::ir::{IrOperation, IrParameterLocation, IrSchema, IrSpec, IrType, SchemaKind};

use super::{
    js_string, member_access, operation_doc_lines, params_optional, property_key,
    unique_operations, unique_schemas,
};
use crate::type_mapper::{RefMode, Scope, TypeMapper, schema_const};

/// Context for `client.ts`: validators for every unique schema and one
/// client member per unique operation id.
pub fn client_context(ir: &IrSpec, mapper: &TypeMapper, base_url: &str) -> Value {
    let schemas: Vec<Value> = unique_schemas(ir)
        .into_iter()
        .map(|schema| validator_context(schema, mapper))
        .collect();
    let operations: Vec<Value> = unique_operations(ir)
        .into_iter()
        .map(|op| operation_context(op, mapper))
        .collect();

    context! {
        base_url => js_string(base_url),
        schemas => schemas,
        operations => operations,
    }
}

fn validator_context(schema: &IrSchema, mapper: &TypeMapper) -> Value {
    let properties: Vec<Value> = schema
        .sorted_properties()
        .into_iter()
        .map(|(name, prop)| {
            let mut validator = mapper.validator(&prop.ty, RefMode::Lazy);
            if !schema.is_required(name) {
                validator.push_str(".optional()");
            }
            context! {
                key => property_key(name),
                validator => validator,
            }
        })
        .collect();

    let expression = match &schema.kind {
        SchemaKind::Object => None,
        SchemaKind::Enum(values) => Some(format!(
            "z.enum([{}])",
            values
                .iter()
                .map(|v| js_string(v))
                .collect::<Vec<_>>()
                .join(", ")
        )),
        SchemaKind::Alias(ty) => Some(mapper.validator(ty, RefMode::Lazy)),
    };

    context! {
        name => schema.name.clone(),
        const_name => schema_const(&schema.name),
        kind => schema.kind.tag(),
        properties => properties,
        expression => expression,
    }
}

fn operation_context(op: &IrOperation, mapper: &TypeMapper) -> Value {
    let query: Vec<Value> = op
        .parameters_in(IrParameterLocation::Query)
        .map(|p| {
            context! {
                name => js_string(&p.name),
                access => member_access("params", &p.name),
            }
        })
        .collect();
    let headers: Vec<Value> = op
        .parameters_in(IrParameterLocation::Header)
        .map(|p| {
            context! {
                name => js_string(&p.name),
                access => member_access("params", &p.name),
            }
        })
        .collect();

    let headers_arg = if headers.is_empty() { "" } else { ", { headers }" };
    let call = if op.method.sends_body() {
        format!(
            "axiosInstance.{}(url, {}{headers_arg})",
            op.method.as_lower(),
            body_argument(op)
        )
    } else {
        format!("axiosInstance.{}(url{headers_arg})", op.method.as_lower())
    };

    let success = op
        .success_response()
        .and_then(|r| r.schema.as_ref())
        .map(|s| s.to_type())
        .filter(|ty| *ty != IrType::Unknown);
    let (return_type, validator) = match &success {
        Some(ty) => (
            mapper.annotation(ty, Scope::Client),
            Some(mapper.validator(ty, RefMode::Direct)),
        ),
        None => ("any".to_string(), None),
    };

    context! {
        id => op.id.clone(),
        doc_lines => operation_doc_lines(op),
        has_params => op.has_params(),
        params_type => params_type(op, mapper),
        params_optional => params_optional(op),
        url_decl => if query.is_empty() { "const" } else { "let" },
        url => url_expression(op),
        query => query,
        headers => headers,
        call => call,
        return_type => return_type,
        validator => validator,
    }
}

/// The request body argument for POST/PUT/PATCH calls.
fn body_argument(op: &IrOperation) -> String {
    if op.request_body.is_some() {
        return "params.body".to_string();
    }
    match op.parameters_in(IrParameterLocation::Body).next() {
        Some(p) => member_access("params", &p.name),
        None => "{}".to_string(),
    }
}

/// The inline object type of the `params` argument.
fn params_type(op: &IrOperation, mapper: &TypeMapper) -> String {
    let mut fields = Vec::new();
    for p in &op.parameters {
        fields.push(format!(
            "    {}{}: {};",
            property_key(&p.name),
            if p.required { "" } else { "?" },
            mapper.annotation(&p.schema, Scope::Client)
        ));
    }
    if let Some(body) = &op.request_body {
        fields.push(format!(
            "    body{}: {};",
            if body.required { "" } else { "?" },
            mapper.annotation(&body.schema.to_type(), Scope::Client)
        ));
    }
    format!("{{\n{}\n  }}", fields.join("\n"))
}

/// `'/pets'` for static paths, otherwise a template literal interpolating
/// declared path parameters.
fn url_expression(op: &IrOperation) -> String {
    let path_params: Vec<&str> = op
        .parameters_in(IrParameterLocation::Path)
        .map(|p| p.name.as_str())
        .collect();

    let mut out = String::with_capacity(op.path.len() + 16);
    let mut interpolated = false;
    let mut rest = op.path.as_str();
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        out.push_str(&escape_template(&rest[..start]));
        if path_params.contains(&name) {
            out.push_str(&format!(
                "${{encodeURIComponent(String({}))}}",
                member_access("params", name)
            ));
            interpolated = true;
        } else {
            log::warn!(
                "{}: path placeholder {{{name}}} has no matching path parameter",
                op.id
            );
            out.push_str(&escape_template(&rest[start..start + len + 2]));
        }
        rest = &rest[start + len + 2..];
    }
    out.push_str(&escape_template(rest));

    if interpolated {
        format!("`{out}`")
    } else {
        js_string(&op.path)
    }
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
