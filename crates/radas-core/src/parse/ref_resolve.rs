use std::collections::HashSet;

use super::components::Components;
use super::operation::{Operation, PathItem};
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};
use super::spec::OpenApiSpec;
use crate::error::ResolveError;

/// Inlines local `#/components/{parameters,requestBodies,responses}` references
/// into every operation.
///
/// Schema references are left as they are: the IR keeps them as named
/// references so generated code can point at the shared declaration. A
/// reference whose target is missing is dropped with a warning rather than
/// failing the run; only reference cycles are fatal.
pub struct RefResolver {
    components: Components,
    visited: HashSet<String>,
}

impl RefResolver {
    pub fn new(spec: &OpenApiSpec) -> Self {
        Self {
            components: spec.components.clone().unwrap_or_default(),
            visited: HashSet::new(),
        }
    }

    /// Resolve the whole spec, returning a copy without parameter, request
    /// body or response references.
    pub fn resolve_spec(&mut self, spec: &OpenApiSpec) -> Result<OpenApiSpec, ResolveError> {
        let mut resolved = spec.clone();
        for (path, item) in &mut resolved.paths {
            log::trace!("resolving references under {path}");
            self.resolve_path_item(item)?;
        }
        Ok(resolved)
    }

    fn resolve_path_item(&mut self, item: &mut PathItem) -> Result<(), ResolveError> {
        item.parameters = self.resolve_parameters(&item.parameters)?;
        for op in item.operations_mut() {
            self.resolve_operation(op)?;
        }
        Ok(())
    }

    fn resolve_operation(&mut self, op: &mut Operation) -> Result<(), ResolveError> {
        op.parameters = self.resolve_parameters(&op.parameters)?;

        if let Some(body) = op.request_body.take() {
            op.request_body = self
                .resolve_request_body(&body)?
                .map(RequestBodyOrRef::RequestBody);
        }

        for response in op.responses.values_mut() {
            if let ResponseOrRef::Ref { ref_path } = response {
                let resolved = self.lookup_response(&ref_path.clone())?;
                *response = ResponseOrRef::Response(resolved);
            }
        }
        Ok(())
    }

    fn resolve_parameters(
        &mut self,
        params: &[ParameterOrRef],
    ) -> Result<Vec<ParameterOrRef>, ResolveError> {
        let mut resolved = Vec::with_capacity(params.len());
        for param in params {
            match param {
                ParameterOrRef::Parameter(p) => resolved.push(ParameterOrRef::Parameter(p.clone())),
                ParameterOrRef::Ref { ref_path } => {
                    if let Some(p) = self.lookup_parameter(ref_path)? {
                        resolved.push(ParameterOrRef::Parameter(p));
                    }
                }
            }
        }
        Ok(resolved)
    }

    fn resolve_request_body(
        &mut self,
        body: &RequestBodyOrRef,
    ) -> Result<Option<RequestBody>, ResolveError> {
        match body {
            RequestBodyOrRef::RequestBody(rb) => Ok(Some(rb.clone())),
            RequestBodyOrRef::Ref { ref_path } => self.lookup_request_body(ref_path),
        }
    }

    // Lookup helpers. Each follows transitive references and guards against
    // cycles with the visited set.

    fn lookup_parameter(&mut self, ref_path: &str) -> Result<Option<Parameter>, ResolveError> {
        let Some(name) = local_ref_name(ref_path, "parameters") else {
            return Ok(None);
        };
        self.enter(ref_path)?;
        let result = match self.components.parameters.get(name).cloned() {
            Some(ParameterOrRef::Parameter(p)) => Ok(Some(p)),
            Some(ParameterOrRef::Ref { ref_path: inner }) => self.lookup_parameter(&inner),
            None => {
                log::warn!("parameter reference {ref_path} not found; skipping it");
                Ok(None)
            }
        };
        self.visited.remove(ref_path);
        result
    }

    fn lookup_request_body(&mut self, ref_path: &str) -> Result<Option<RequestBody>, ResolveError> {
        let Some(name) = local_ref_name(ref_path, "requestBodies") else {
            return Ok(None);
        };
        self.enter(ref_path)?;
        let result = match self.components.request_bodies.get(name).cloned() {
            Some(RequestBodyOrRef::RequestBody(rb)) => Ok(Some(rb)),
            Some(RequestBodyOrRef::Ref { ref_path: inner }) => self.lookup_request_body(&inner),
            None => {
                log::warn!("request body reference {ref_path} not found; treating it as absent");
                Ok(None)
            }
        };
        self.visited.remove(ref_path);
        result
    }

    fn lookup_response(&mut self, ref_path: &str) -> Result<Response, ResolveError> {
        let Some(name) = local_ref_name(ref_path, "responses") else {
            return Ok(unresolved_response(ref_path));
        };
        self.enter(ref_path)?;
        let result = match self.components.responses.get(name).cloned() {
            Some(ResponseOrRef::Response(r)) => Ok(r),
            Some(ResponseOrRef::Ref { ref_path: inner }) => self.lookup_response(&inner),
            None => {
                log::warn!("response reference {ref_path} not found; using an untyped response");
                Ok(unresolved_response(ref_path))
            }
        };
        self.visited.remove(ref_path);
        result
    }

    fn enter(&mut self, ref_path: &str) -> Result<(), ResolveError> {
        if !self.visited.insert(ref_path.to_string()) {
            return Err(ResolveError::CircularRef(ref_path.to_string()));
        }
        Ok(())
    }
}

fn unresolved_response(ref_path: &str) -> Response {
    Response {
        description: format!("unresolved {ref_path}"),
        content: Default::default(),
    }
}

/// Extract the component name from a local reference such as
/// `#/components/parameters/Limit`. Returns `None` (after logging) for
/// references into other sections or documents.
fn local_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Option<&'a str> {
    match parse_ref_name(ref_path, expected_section) {
        Ok(name) => Some(name),
        Err(err) => {
            log::warn!("{err}; ignoring it");
            None
        }
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
pub fn parse_ref_name<'a>(
    ref_path: &'a str,
    expected_section: &str,
) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn parse_ref_name_extracts_component() {
        assert_eq!(
            parse_ref_name("#/components/schemas/Pet", "schemas").unwrap(),
            "Pet"
        );
        assert!(parse_ref_name("#/definitions/Pet", "schemas").is_err());
        assert!(parse_ref_name("#/components/responses/Pet", "schemas").is_err());
    }

    #[test]
    fn inlines_parameter_and_response_refs() {
        let spec = parse::from_yaml(
            r#"
openapi: 3.0.3
info: {title: t, version: '1'}
paths:
  /pets:
    get:
      parameters:
        - $ref: '#/components/parameters/Limit'
        - $ref: '#/components/parameters/Missing'
      responses:
        '404':
          $ref: '#/components/responses/NotFound'
components:
  parameters:
    Limit: {name: limit, in: query, schema: {type: integer}}
  responses:
    NotFound: {description: not found}
"#,
        )
        .unwrap();

        let resolved = RefResolver::new(&spec).resolve_spec(&spec).unwrap();
        let op = resolved.paths["/pets"].get.as_ref().unwrap();
        assert_eq!(op.parameters.len(), 1);
        assert!(matches!(&op.parameters[0], ParameterOrRef::Parameter(p) if p.name == "limit"));
        assert!(matches!(
            &op.responses["404"],
            ResponseOrRef::Response(r) if r.description == "not found"
        ));
    }

    #[test]
    fn cyclic_parameter_refs_are_rejected() {
        let spec = parse::from_yaml(
            r#"
openapi: 3.0.3
info: {title: t, version: '1'}
paths:
  /x:
    get:
      parameters:
        - $ref: '#/components/parameters/A'
      responses: {'200': {description: ok}}
components:
  parameters:
    A: {$ref: '#/components/parameters/B'}
    B: {$ref: '#/components/parameters/A'}
"#,
        )
        .unwrap();

        let err = RefResolver::new(&spec).resolve_spec(&spec).unwrap_err();
        assert!(matches!(err, ResolveError::CircularRef(_)));
    }
}
