use std::fmt;

use minijinja::{Environment, Value};
use radas_core::GeneratedFile;
use radas_core::ir::IrSpec;
use radas_core::ir::grouping::{RelatedOperationMatcher, TrailingParamMatcher};

use crate::emitters::{self, escape_jsdoc};
use crate::error::RenderError;
use crate::type_mapper::TypeMapper;

/// Base URL used when neither the caller nor the document provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

const TEMPLATES: [(&str, &str); 5] = [
    ("client.ts.j2", include_str!("../templates/client.ts.j2")),
    ("dto.ts.j2", include_str!("../templates/dto.ts.j2")),
    ("queries.ts.j2", include_str!("../templates/queries.ts.j2")),
    ("queryClient.ts.j2", include_str!("../templates/queryClient.ts.j2")),
    ("stores.ts.j2", include_str!("../templates/stores.ts.j2")),
];

/// One generated TypeScript module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Client,
    Dto,
    Hooks,
    QueryClient,
    Stores,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::Dto,
        Artifact::Client,
        Artifact::Hooks,
        Artifact::QueryClient,
        Artifact::Stores,
    ];

    /// Output file name, relative to the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Client => "client.ts",
            Artifact::Dto => "dto.ts",
            Artifact::Hooks => "queries.ts",
            Artifact::QueryClient => "queryClient.ts",
            Artifact::Stores => "stores.ts",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Artifact::Client => "client.ts.j2",
            Artifact::Dto => "dto.ts.j2",
            Artifact::Hooks => "queries.ts.j2",
            Artifact::QueryClient => "queryClient.ts.j2",
            Artifact::Stores => "stores.ts.j2",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Artifact::Client => "client",
            Artifact::Dto => "dto",
            Artifact::Hooks => "hooks",
            Artifact::QueryClient => "query-client",
            Artifact::Stores => "stores",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Overrides the document's first server URL in `client.ts`.
    pub base_url: Option<String>,
}

/// Owns the template environment and the helpers templates are fed from.
pub struct Renderer {
    env: Environment<'static>,
    mapper: TypeMapper,
    matcher: Box<dyn RelatedOperationMatcher>,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_filter("escape_jsdoc", escape_jsdoc);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|source| RenderError::Template {
                    template: name.to_string(),
                    source,
                })?;
        }

        Ok(Self {
            env,
            mapper: TypeMapper,
            matcher: Box::new(TrailingParamMatcher),
            options,
        })
    }

    /// Replace the strategy deciding which GET paths address single items.
    pub fn with_matcher(mut self, matcher: impl RelatedOperationMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Explicit option, then the first server URL, then [`DEFAULT_BASE_URL`].
    pub fn base_url<'a>(&'a self, ir: &'a IrSpec) -> &'a str {
        self.options
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| ir.servers.first().map(|s| s.url.as_str()))
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn render(&self, artifact: Artifact, ir: &IrSpec) -> Result<GeneratedFile, RenderError> {
        let ctx = self.context(artifact, ir);
        let content = self
            .env
            .get_template(artifact.template())
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(|source| RenderError::Render { artifact, source })?;
        log::debug!("rendered {} ({} bytes)", artifact.file_name(), content.len());

        Ok(GeneratedFile {
            path: artifact.file_name().to_string(),
            content,
        })
    }

    fn context(&self, artifact: Artifact, ir: &IrSpec) -> Value {
        match artifact {
            Artifact::Client => {
                emitters::client::client_context(ir, &self.mapper, self.base_url(ir))
            }
            Artifact::Dto => emitters::dto::dto_context(ir, &self.mapper),
            Artifact::Hooks => emitters::hooks::hooks_context(ir, self.matcher.as_ref()),
            Artifact::QueryClient => emitters::query_client::query_client_context(),
            Artifact::Stores => emitters::stores::stores_context(ir),
        }
    }
}
