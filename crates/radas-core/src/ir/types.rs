use indexmap::IndexMap;

use super::operations::IrOperation;
use super::schemas::IrSchema;

/// A generator-ready intermediate representation of an OpenAPI document.
///
/// Owns its data; nothing borrows from the source document.
#[derive(Debug, Clone, Default)]
pub struct IrSpec {
    pub info: IrInfo,
    pub servers: Vec<IrServer>,
    pub schemas: Vec<IrSchema>,
    pub operations: Vec<IrOperation>,
    /// Namespace to entity names, both in first-seen order.
    pub namespaces: IndexMap<String, Vec<String>>,
}

impl IrSpec {
    pub fn operation(&self, id: &str) -> Option<&IrOperation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn schema(&self, name: &str) -> Option<&IrSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

/// API metadata.
#[derive(Debug, Clone, Default)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A server URL.
#[derive(Debug, Clone)]
pub struct IrServer {
    pub url: String,
    pub description: Option<String>,
}
