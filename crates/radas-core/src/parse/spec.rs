use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::PathItem;
use super::server::Server;

/// Info object describing the API.
///
/// Title and version default to empty so that a document missing them still
/// loads and the validator can report the gap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    #[serde(default)]
    pub info: Info,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl OpenApiSpec {
    /// Whether the document declares an OpenAPI 3.1.x version.
    pub fn is_v3_1(&self) -> bool {
        self.openapi.starts_with("3.1")
    }
}
