use std::path::{Path, PathBuf};

use radas_core::CodeGenerator;
use radas_core::emit::write_files;
use radas_core::load::{LoadOptions, load_spec};
use radas_core::transform::transform;

use crate::error::PipelineError;
use crate::generator::{GenerateConfig, ReactClientGenerator};

/// One `gen-api` run.
#[derive(Debug, Clone)]
pub struct GenApiConfig {
    pub spec: PathBuf,
    pub output: PathBuf,
    pub generate: GenerateConfig,
    pub load: LoadOptions,
}

impl GenApiConfig {
    pub fn new(spec: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            spec: spec.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            generate: GenerateConfig::default(),
            load: LoadOptions::default(),
        }
    }
}

/// Load, transform, render, then write. Every artifact is rendered before
/// the first file is written, so a render failure leaves the output
/// directory untouched. Returns the written paths.
pub fn generate_api(config: &GenApiConfig) -> Result<Vec<PathBuf>, PipelineError> {
    let spec = load_spec(&config.spec, config.load)?;
    let ir = transform(&spec);
    let files = ReactClientGenerator.generate(&ir, &config.generate)?;
    let written = write_files(&config.output, &files)?;
    log::info!(
        "generated {} file(s) in {}",
        written.len(),
        config.output.display()
    );
    Ok(written)
}
