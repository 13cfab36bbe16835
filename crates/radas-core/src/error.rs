use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationIssue;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("failed to read referenced document {}: {source}", path.display())]
    ExternalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse referenced document {}: {source}", path.display())]
    ExternalParse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to resolve references in {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },

    #[error("{} failed validation with {} issue(s):\n{}", path.display(), issues.len(), format_issues(issues))]
    Validation {
        path: PathBuf,
        issues: Vec<ValidationIssue>,
    },
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
