//! Template context builders, one module per artifact.
//!
//! Contexts carry fully rendered TypeScript fragments; the templates only
//! lay them out. Every list is built in IR order and deduplicated
//! first-wins, so output is stable across runs.

pub mod client;
pub mod dto;
pub mod hooks;
pub mod query_client;
pub mod stores;

use std::collections::HashSet;

use radas_core::ir::{IrOperation, IrSchema, IrSpec};

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
pub fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// Single-quoted JavaScript string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Object key as written in a type or literal: bare when possible.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// `base.name`, or `base['name']` for names that are not identifiers.
pub fn member_access(base: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{base}.{name}")
    } else {
        format!("{base}[{}]", js_string(name))
    }
}

/// Split free text into trimmed JSDoc lines, dropping leading and trailing
/// blank lines.
pub fn doc_lines(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };
    let lines: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].to_vec(),
        _ => Vec::new(),
    }
}

/// JSDoc lines for an operation: its description or summary, else
/// `METHOD path`, plus `@deprecated` when flagged.
pub fn operation_doc_lines(op: &IrOperation) -> Vec<String> {
    let mut lines = doc_lines(op.doc());
    if lines.is_empty() {
        lines.push(format!("{} {}", op.method.as_str(), op.path));
    }
    if op.deprecated {
        lines.push("@deprecated".to_string());
    }
    lines
}

/// Whether the client member can be called without arguments.
pub fn params_optional(op: &IrOperation) -> bool {
    op.parameters.iter().all(|p| !p.required)
        && op.request_body.as_ref().is_none_or(|body| !body.required)
}

/// Component schemas with duplicate generated names removed, first wins.
pub fn unique_schemas(ir: &IrSpec) -> Vec<&IrSchema> {
    let mut seen = HashSet::new();
    ir.schemas
        .iter()
        .filter(|schema| {
            let fresh = seen.insert(schema.name.as_str());
            if !fresh {
                log::warn!(
                    "schema {} also generates the name {}; skipping it",
                    schema.original_name,
                    schema.name
                );
            }
            fresh
        })
        .collect()
}

/// Operations with duplicate ids removed, first wins.
pub fn unique_operations(ir: &IrSpec) -> Vec<&IrOperation> {
    let mut seen = HashSet::new();
    ir.operations
        .iter()
        .filter(|op| seen.insert(op.id.as_str()))
        .collect()
}
