use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// A media type object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

/// Pick `application/json` when declared, otherwise the first content type.
pub fn preferred_media_type(
    content: &IndexMap<String, MediaType>,
) -> Option<(&String, &MediaType)> {
    content
        .get_key_value("application/json")
        .or_else(|| content.first())
}
