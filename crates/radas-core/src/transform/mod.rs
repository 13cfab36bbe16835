pub mod name_normalizer;
pub mod schema_resolver;
pub mod spec_to_ir;

pub use spec_to_ir::{derive_namespace, transform};
