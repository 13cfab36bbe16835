pub mod bundle;
pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Source syntax of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` files are read as JSON; everything else goes through the YAML
    /// parser, which also accepts JSON.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    from_value(parse_value(input, DocumentFormat::Yaml)?)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    from_value(parse_value(input, DocumentFormat::Json)?)
}

/// Parse raw text into an untyped document tree.
pub fn parse_value(input: &str, format: DocumentFormat) -> Result<serde_json::Value, ParseError> {
    let value = match format {
        DocumentFormat::Json => serde_json::from_str(input)?,
        DocumentFormat::Yaml => serde_yaml_ng::from_str(input)?,
    };
    Ok(value)
}

/// Convert an untyped document tree into the typed model.
pub fn from_value(mut value: serde_json::Value) -> Result<OpenApiSpec, ParseError> {
    // Unquoted `openapi: 3.1` arrives from YAML as a float.
    if let Some(version) = value.get_mut("openapi")
        && version.is_number()
    {
        let text = version.to_string();
        *version = serde_json::Value::String(text);
    }
    if value.get("openapi").is_none() {
        if let Some(swagger) = value.get("swagger").and_then(|v| v.as_str()) {
            return Err(ParseError::UnsupportedVersion(swagger.to_string()));
        }
        return Err(ParseError::MissingField("openapi".to_string()));
    }
    let spec: OpenApiSpec = serde_json::from_value(value)?;
    validate_version(&spec)?;
    Ok(spec)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_swagger_2() {
        let err = from_yaml("swagger: '2.0'\ninfo: {title: x, version: '1'}\n").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn rejects_missing_version_field() {
        let err = from_json(r#"{"info": {"title": "x", "version": "1"}}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(f) if f == "openapi"));
    }

    #[test]
    fn yaml_parser_accepts_json_text() {
        let spec = from_yaml(r#"{"openapi": "3.0.3", "info": {"title": "x", "version": "1"}}"#)
            .unwrap();
        assert_eq!(spec.openapi, "3.0.3");
    }

    #[test]
    fn unquoted_version_is_read_as_text() {
        let spec = from_yaml("openapi: 3.1\ninfo: {title: x, version: '1'}\n").unwrap();
        assert_eq!(spec.openapi, "3.1");
        assert!(spec.is_v3_1());
    }

    #[test]
    fn format_from_extension() {
        use std::path::Path;
        assert_eq!(
            DocumentFormat::from_path(Path::new("api.JSON")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("api.yml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("api")),
            DocumentFormat::Yaml
        );
    }
}
