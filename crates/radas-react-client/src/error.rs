use radas_core::error::{EmitError, LoadError};
use thiserror::Error;

use crate::renderer::Artifact;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load template {template}: {source}")]
    Template {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("generate-{artifact} failed: {source}")]
    Render {
        artifact: Artifact,
        #[source]
        source: minijinja::Error,
    },
}

/// A failed `gen-api` run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("emit failed: {0}")]
    Emit(#[from] EmitError),
}
