pub mod config;
pub mod emit;
pub mod error;
pub mod ir;
pub mod load;
pub mod parse;
pub mod transform;
pub mod validate;

/// A rendered artifact with its path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
