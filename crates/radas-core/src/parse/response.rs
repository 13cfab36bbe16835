use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{MediaType, preferred_media_type};

/// A response definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    pub fn preferred_content(&self) -> Option<(&String, &MediaType)> {
        preferred_media_type(&self.content)
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
