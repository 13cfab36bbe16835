use radas_core::ir::IrSpec;
use radas_core::{CodeGenerator, GeneratedFile};

use crate::error::RenderError;
use crate::renderer::{Artifact, RenderOptions, Renderer};

/// Which artifacts a run produces. DTOs are always produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub all: bool,
    pub client: bool,
    pub hooks: bool,
    pub stores: bool,
}

impl Selection {
    pub fn everything() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Selected artifacts in emission order. Without any specific flag,
    /// everything is selected; hooks bring the shared query client along.
    pub fn artifacts(&self) -> Vec<Artifact> {
        let everything = self.all || !(self.client || self.hooks || self.stores);
        Artifact::ALL
            .into_iter()
            .filter(|artifact| match artifact {
                Artifact::Dto => true,
                Artifact::Client => everything || self.client,
                Artifact::Hooks | Artifact::QueryClient => everything || self.hooks,
                Artifact::Stores => everything || self.stores,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    pub selection: Selection,
    pub base_url: Option<String>,
}

/// TypeScript client generator for React: axios + zod client, React Query
/// hooks and zustand stores.
pub struct ReactClientGenerator;

impl CodeGenerator for ReactClientGenerator {
    type Config = GenerateConfig;
    type Error = RenderError;

    fn generate(
        &self,
        ir: &IrSpec,
        config: &GenerateConfig,
    ) -> Result<Vec<GeneratedFile>, RenderError> {
        let renderer = Renderer::new(RenderOptions {
            base_url: config.base_url.clone(),
        })?;
        config
            .selection
            .artifacts()
            .into_iter()
            .map(|artifact| renderer.render(artifact, ir))
            .collect()
    }
}
