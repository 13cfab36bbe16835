pub mod emitters;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod renderer;
pub mod type_mapper;

pub use error::{PipelineError, RenderError};
pub use generator::{GenerateConfig, ReactClientGenerator, Selection};
pub use pipeline::{GenApiConfig, generate_api};
pub use renderer::{Artifact, RenderOptions, Renderer};
