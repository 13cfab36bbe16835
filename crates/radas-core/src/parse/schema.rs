use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// Vendor or misspelled type keywords (`file`, `uuid`, ...).
    #[serde(other)]
    Unknown,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Null => "null",
            SchemaType::Unknown => "unknown",
        }
    }
}

/// The `type` field can be a single type or, since 3.1, an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    /// Whether `null` is one of the declared types.
    pub fn includes_null(&self) -> bool {
        match self {
            TypeSet::Single(t) => *t == SchemaType::Null,
            TypeSet::Multiple(types) => types.contains(&SchemaType::Null),
        }
    }

    /// Declared types other than `null`, in document order.
    pub fn non_null(&self) -> Vec<SchemaType> {
        match self {
            TypeSet::Single(t) if *t != SchemaType::Null => vec![*t],
            TypeSet::Single(_) => Vec::new(),
            TypeSet::Multiple(types) => types
                .iter()
                .copied()
                .filter(|t| *t != SchemaType::Null)
                .collect(),
        }
    }
}

/// A reference, an inline schema, or a JSON Schema boolean schema
/// (`true` accepts anything, `false` nothing; 3.1 only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
    Bool(bool),
}

/// The subset of JSON Schema that drives client generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    /// OpenAPI 3.0 nullability flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// True when the schema is nullable either through the 3.0 flag or a 3.1
    /// type union containing `null`.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
            || self
                .schema_type
                .as_ref()
                .is_some_and(|t| t.includes_null() && !t.non_null().is_empty())
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}
