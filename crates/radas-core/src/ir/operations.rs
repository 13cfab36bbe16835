use indexmap::IndexMap;

use super::schemas::{IrType, SchemaRef};

/// HTTP methods the generator emits code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lowercase form, as used for axios calls.
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Case-insensitive parse; unsupported verbs yield `None`.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    /// Whether the axios call for this verb takes a request body argument.
    pub fn sends_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// One HTTP verb + path combination.
#[derive(Debug, Clone)]
pub struct IrOperation {
    /// Operation identifier, sanitized to a valid TypeScript identifier.
    pub id: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub request_body: Option<IrRequestBody>,
    /// Status code to response, in document order.
    pub responses: IndexMap<String, IrResponse>,
    pub namespace: String,
    pub entity: String,
    pub deprecated: bool,
}

impl IrOperation {
    /// The first 2xx response, if any.
    pub fn success_response(&self) -> Option<&IrResponse> {
        self.responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .map(|(_, response)| response)
    }

    /// Whether the generated client member takes a parameters argument.
    pub fn has_params(&self) -> bool {
        !self.parameters.is_empty() || self.request_body.is_some()
    }

    pub fn parameters_in(
        &self,
        location: IrParameterLocation,
    ) -> impl Iterator<Item = &IrParameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    /// Human-readable text for doc comments: description, else summary.
    pub fn doc(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.summary.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Parameter location. Unrecognised locations are mapped to `Query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl IrParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrParameterLocation::Path => "path",
            IrParameterLocation::Query => "query",
            IrParameterLocation::Header => "header",
            IrParameterLocation::Body => "body",
        }
    }
}

/// A path/query/header parameter. The type is kept as a descriptor and only
/// rendered to validator syntax at generation time.
#[derive(Debug, Clone)]
pub struct IrParameter {
    pub name: String,
    pub location: IrParameterLocation,
    pub required: bool,
    pub schema: IrType,
    pub description: Option<String>,
}

/// A resolved request body.
#[derive(Debug, Clone)]
pub struct IrRequestBody {
    pub required: bool,
    pub schema: SchemaRef,
    pub content_type: String,
    pub description: Option<String>,
}

/// A resolved response.
#[derive(Debug, Clone)]
pub struct IrResponse {
    pub description: String,
    pub schema: Option<SchemaRef>,
}
