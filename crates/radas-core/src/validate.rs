//! Structural checks against the OpenAPI 3.0 rules the generator relies on.
//!
//! The checks are deliberately 3.0-flavoured: type arrays and the `null` type
//! are reported even though they are legal in 3.1. The loader decides whether
//! a report is fatal.

use std::collections::HashMap;
use std::fmt;

use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};
use crate::parse::spec::OpenApiSpec;

/// One structural problem, located by a dotted path into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Run every check and return the issues in document order.
pub fn validate(spec: &OpenApiSpec) -> Vec<ValidationIssue> {
    let mut validator = Validator {
        spec,
        issues: Vec::new(),
        operation_ids: HashMap::new(),
    };
    validator.run();
    validator.issues
}

struct Validator<'a> {
    spec: &'a OpenApiSpec,
    issues: Vec<ValidationIssue>,
    operation_ids: HashMap<&'a str, String>,
}

impl<'a> Validator<'a> {
    fn run(&mut self) {
        let spec = self.spec;
        if spec.info.title.trim().is_empty() {
            self.issue("info.title", "title is required");
        }
        if spec.info.version.trim().is_empty() {
            self.issue("info.version", "version is required");
        }

        for (path, item) in &spec.paths {
            self.check_path_item(path, item);
        }

        if let Some(components) = &spec.components {
            for (name, schema) in &components.schemas {
                self.check_schema(&format!("components.schemas.{name}"), schema);
            }
            for (name, param) in &components.parameters {
                if let ParameterOrRef::Parameter(p) = param {
                    self.check_parameter(&format!("components.parameters.{name}"), p);
                }
            }
        }
    }

    fn check_path_item(&mut self, path: &'a str, item: &'a PathItem) {
        let location = format!("paths.{path}");
        if !path.starts_with('/') {
            self.issue(&location, "path must start with '/'");
        }

        let placeholders = path_placeholders(path);
        let shared = self.inline_parameters(&location, &item.parameters);

        for (method, op) in item.operations() {
            let op_location = format!("{location}.{}", method.to_lowercase());
            self.check_operation(&op_location, op);

            let mut params = shared.clone();
            for p in self.inline_parameters(&op_location, &op.parameters) {
                params.retain(|existing: &&Parameter| {
                    existing.name != p.name || existing.location != p.location
                });
                params.push(p);
            }

            let declared: Vec<&str> = params
                .iter()
                .filter(|p| p.location == ParameterLocation::Path)
                .map(|p| p.name.as_str())
                .collect();
            for placeholder in &placeholders {
                if !declared.contains(&placeholder.as_str()) {
                    self.issue(
                        &op_location,
                        &format!("path parameter '{placeholder}' is not declared"),
                    );
                }
            }
            for name in &declared {
                if !placeholders.iter().any(|p| p == name) {
                    self.issue(
                        &op_location,
                        &format!("path parameter '{name}' does not appear in the path"),
                    );
                }
            }
        }
    }

    /// Resolve parameters for checking: inline ones as-is, local references
    /// through components. Unresolvable references are reported.
    fn inline_parameters(
        &mut self,
        location: &str,
        params: &'a [ParameterOrRef],
    ) -> Vec<&'a Parameter> {
        let mut out = Vec::new();
        for (i, param) in params.iter().enumerate() {
            let param_location = format!("{location}.parameters[{i}]");
            match param {
                ParameterOrRef::Parameter(p) => {
                    self.check_parameter(&param_location, p);
                    out.push(p);
                }
                ParameterOrRef::Ref { ref_path } => match self.lookup_parameter(ref_path) {
                    Some(p) => out.push(p),
                    None => self.unresolved(&param_location, ref_path),
                },
            }
        }
        out
    }

    fn lookup_parameter(&self, ref_path: &str) -> Option<&'a Parameter> {
        let name = ref_path.strip_prefix("#/components/parameters/")?;
        match self.spec.components.as_ref()?.parameters.get(name)? {
            ParameterOrRef::Parameter(p) => Some(p),
            ParameterOrRef::Ref { .. } => None,
        }
    }

    fn check_operation(&mut self, location: &str, op: &'a Operation) {
        if let Some(id) = op.operation_id.as_deref() {
            if let Some(first) = self.operation_ids.get(id) {
                let message = format!("operationId '{id}' is already used by {first}");
                self.issue(location, &message);
            } else {
                self.operation_ids.insert(id, location.to_string());
            }
        }

        if let Some(body) = &op.request_body {
            match body {
                RequestBodyOrRef::RequestBody(rb) => {
                    for (content_type, media) in &rb.content {
                        if let Some(schema) = &media.schema {
                            self.check_schema(
                                &format!("{location}.requestBody.{content_type}"),
                                schema,
                            );
                        }
                    }
                }
                RequestBodyOrRef::Ref { ref_path } => {
                    self.check_component_ref(location, ref_path, "requestBodies");
                }
            }
        }

        if op.responses.is_empty() {
            self.issue(location, "at least one response is required");
        }
        for (status, response) in &op.responses {
            let response_location = format!("{location}.responses.{status}");
            match response {
                ResponseOrRef::Response(r) => {
                    for (content_type, media) in &r.content {
                        if let Some(schema) = &media.schema {
                            self.check_schema(
                                &format!("{response_location}.{content_type}"),
                                schema,
                            );
                        }
                    }
                }
                ResponseOrRef::Ref { ref_path } => {
                    self.check_component_ref(&response_location, ref_path, "responses");
                }
            }
        }
    }

    fn check_parameter(&mut self, location: &str, param: &Parameter) {
        match param.location {
            ParameterLocation::Query
            | ParameterLocation::Header
            | ParameterLocation::Cookie => {}
            ParameterLocation::Path => {
                if !param.required {
                    self.issue(
                        location,
                        &format!("path parameter '{}' must be required", param.name),
                    );
                }
            }
            ParameterLocation::Body | ParameterLocation::Other => {
                self.issue(
                    location,
                    &format!("parameter '{}' has an invalid location", param.name),
                );
            }
        }
        if let Some(schema) = &param.schema {
            self.check_schema(&format!("{location}.schema"), schema);
        }
    }

    fn check_schema(&mut self, location: &str, schema_or_ref: &SchemaOrRef) {
        let schema = match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                if ref_path.starts_with('#') {
                    self.check_component_ref(location, ref_path, "schemas");
                }
                return;
            }
            SchemaOrRef::Schema(schema) => schema,
            SchemaOrRef::Bool(_) => {
                self.issue(location, "schema must be an object, not a boolean");
                return;
            }
        };
        self.check_schema_type(location, schema);

        for (name, prop) in &schema.properties {
            self.check_schema(&format!("{location}.properties.{name}"), prop);
        }
        if let Some(items) = &schema.items {
            self.check_schema(&format!("{location}.items"), items);
        }
        if let Some(AdditionalProperties::Schema(extra)) = &schema.additional_properties {
            self.check_schema(&format!("{location}.additionalProperties"), extra);
        }
        for (keyword, list) in [
            ("allOf", &schema.all_of),
            ("oneOf", &schema.one_of),
            ("anyOf", &schema.any_of),
        ] {
            for (i, sub) in list.iter().enumerate() {
                self.check_schema(&format!("{location}.{keyword}[{i}]"), sub);
            }
        }
    }

    fn check_schema_type(&mut self, location: &str, schema: &Schema) {
        match &schema.schema_type {
            Some(TypeSet::Multiple(_)) => {
                self.issue(location, "type must be a single string, not an array");
            }
            Some(TypeSet::Single(SchemaType::Null)) => {
                self.issue(location, "'null' is not a valid type");
            }
            Some(TypeSet::Single(SchemaType::Unknown)) => {
                self.issue(location, "unknown type");
            }
            _ => {}
        }
    }

    fn check_component_ref(&mut self, location: &str, ref_path: &str, section: &str) {
        let Some(components) = &self.spec.components else {
            self.unresolved(location, ref_path);
            return;
        };
        let found = ref_path
            .strip_prefix(&format!("#/components/{section}/"))
            .is_some_and(|name| match section {
                "schemas" => components.schemas.contains_key(name),
                "responses" => components.responses.contains_key(name),
                "requestBodies" => components.request_bodies.contains_key(name),
                "parameters" => components.parameters.contains_key(name),
                _ => false,
            });
        if !found {
            self.unresolved(location, ref_path);
        }
    }

    fn unresolved(&mut self, location: &str, ref_path: &str) {
        self.issue(location, &format!("reference {ref_path} does not resolve"));
    }

    fn issue(&mut self, location: &str, message: &str) {
        self.issues.push(ValidationIssue {
            location: location.to_string(),
            message: message.to_string(),
        });
    }
}

/// Names of the `{placeholder}` segments in a path template.
pub fn path_placeholders(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        names.push(rest[start + 1..start + 1 + len].to_string());
        rest = &rest[start + 1 + len + 1..];
    }
    names
}
