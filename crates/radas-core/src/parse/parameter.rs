use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// Parameter location.
///
/// `body` is a Swagger 2 holdover some hand-written documents still use.
/// Anything unrecognised is kept as `Other` and treated as a query parameter
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
    Body,
    #[serde(other)]
    Other,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Body => "body",
            ParameterLocation::Other => "other",
        }
    }
}

/// An API parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}
