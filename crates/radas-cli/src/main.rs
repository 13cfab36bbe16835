use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use radas_core::config::{self, RadasConfig};
use radas_core::ir::IrSpec;
use radas_core::ir::grouping::group_by_namespace;
use radas_core::load::{LoadOptions, load_spec};
use radas_core::transform;
use radas_react_client::{GenApiConfig, GenerateConfig, Selection, generate_api};

/// Spec path used when neither a flag nor a manifest names one.
const DEFAULT_SPEC: &str = "./merged-api.json";
/// Output directory used when neither a flag nor a manifest names one.
const DEFAULT_OUTPUT: &str = "./src/__generated__/api";
/// Output directory, relative to the manifest, for manifest-driven runs.
const MANIFEST_OUTPUT: &str = "__generated__/api";

#[derive(Parser)]
#[command(name = "radas", about = "OpenAPI to TypeScript client generator", version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Frontend code generation
    #[command(alias = "frontend")]
    Fe {
        #[command(subcommand)]
        command: FrontendCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum FrontendCommands {
    /// Generate the TypeScript client, hooks and stores from an OpenAPI spec
    GenApi(GenApiArgs),

    /// Generate clients for every API contract listed in radas.yml
    Gen {
        /// Path to radas.yml (searched upward from the current directory by default)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the intermediate representation built from an OpenAPI spec
    InspectApi {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },
}

#[derive(Args, Debug, Default)]
struct GenApiArgs {
    /// Input OpenAPI spec (defaults to the first API contract in radas.yml)
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base URL baked into the client
    #[arg(long)]
    base_url: Option<String>,

    /// Generate every artifact
    #[arg(long)]
    all: bool,

    /// Generate the axios client
    #[arg(long, alias = "zodios")]
    client: bool,

    /// Generate React Query hooks
    #[arg(long)]
    hooks: bool,

    /// Generate zustand stores
    #[arg(long)]
    stores: bool,

    /// Skip OpenAPI validation
    #[arg(long)]
    skip_validation: bool,

    /// Report only validation errors, not warnings
    #[arg(long)]
    validation_errors_only: bool,
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Fe { command } => match command {
            FrontendCommands::GenApi(args) => cmd_gen_api(args),
            FrontendCommands::Gen { config } => cmd_gen(config),
            FrontendCommands::InspectApi { spec, format } => cmd_inspect_api(&spec, format),
        },

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "radas", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// The nearest `radas.yml`, if any. An unreadable manifest is reported and
/// ignored; `gen-api` still works from flags alone.
fn discover_manifest() -> Result<Option<(PathBuf, RadasConfig)>> {
    let cwd = env::current_dir().context("failed to read the current directory")?;
    let Some(path) = config::find_config(&cwd) else {
        return Ok(None);
    };
    match config::load_config(&path) {
        Ok(manifest) => Ok(Some((path, manifest))),
        Err(err) => {
            log::warn!("ignoring {}: {err}", path.display());
            Ok(None)
        }
    }
}

fn manifest_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

/// Fold flags and manifest defaults into one run. Flags win; a spec taken
/// from the manifest moves the default output next to the manifest.
fn plan_gen_api(args: GenApiArgs, manifest: Option<(&Path, &RadasConfig)>) -> GenApiConfig {
    let mut spec_from_manifest = false;
    let spec = match (&args.spec, manifest) {
        (Some(spec), _) => spec.clone(),
        (None, Some((path, cfg))) if !cfg.contract.api.is_empty() => {
            spec_from_manifest = true;
            config::resolve_path(manifest_dir(path), &cfg.contract.api[0].path)
        }
        _ => PathBuf::from(DEFAULT_SPEC),
    };

    let defaults = manifest.map(|(path, cfg)| (manifest_dir(path), &cfg.frontend.gen_api));
    let manifest_output =
        defaults.and_then(|(dir, gen_api)| gen_api.output.as_deref().map(|out| dir.join(out)));
    let output = match (&args.output, manifest_output, defaults) {
        (Some(output), _, _) => output.clone(),
        (None, Some(output), _) => output,
        (None, None, Some((dir, _))) if spec_from_manifest => dir.join(MANIFEST_OUTPUT),
        _ => PathBuf::from(DEFAULT_OUTPUT),
    };

    let base_url = args
        .base_url
        .clone()
        .or_else(|| defaults.and_then(|(_, gen_api)| gen_api.base_url.clone()));
    let load = LoadOptions {
        skip_validation: args.skip_validation
            || defaults.is_some_and(|(_, gen_api)| gen_api.skip_validation),
        errors_only: args.validation_errors_only
            || defaults.is_some_and(|(_, gen_api)| gen_api.validation_errors_only),
    };

    GenApiConfig {
        spec,
        output,
        generate: GenerateConfig {
            selection: Selection {
                all: args.all,
                client: args.client,
                hooks: args.hooks,
                stores: args.stores,
            },
            base_url,
        },
        load,
    }
}

fn cmd_gen_api(args: GenApiArgs) -> Result<()> {
    let manifest = discover_manifest()?;
    let spec_flag = args.spec.is_some();
    let plan = plan_gen_api(
        args,
        manifest.as_ref().map(|(path, cfg)| (path.as_path(), cfg)),
    );

    if !spec_flag && let Some((path, _)) = &manifest {
        eprintln!("Using API spec {} from {}", plan.spec.display(), path.display());
    }
    run_generation(&plan)
}

fn run_generation(plan: &GenApiConfig) -> Result<()> {
    if !plan.spec.is_file() {
        anyhow::bail!("API spec file not found: {}", plan.spec.display());
    }
    log::info!(
        "generating client code from {} into {}",
        plan.spec.display(),
        plan.output.display()
    );

    let written = generate_api(plan)
        .with_context(|| format!("failed to generate client from {}", plan.spec.display()))?;
    for path in &written {
        eprintln!("  wrote {}", path.display());
    }
    eprintln!(
        "Generated {} files in {}",
        written.len(),
        plan.output.display()
    );
    Ok(())
}

fn cmd_gen(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = match config_path {
        Some(path) if path.is_dir() => path.join(config::CONFIG_FILE_NAME),
        Some(path) => path,
        None => {
            let cwd = env::current_dir().context("failed to read the current directory")?;
            config::find_config(&cwd).with_context(|| {
                format!(
                    "no {} found in {} or its parents",
                    config::CONFIG_FILE_NAME,
                    cwd.display()
                )
            })?
        }
    };
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let base = manifest_dir(&config_path);

    eprintln!("Generating code for project: {}", cfg.name);
    if !cfg.description.is_empty() {
        eprintln!("  {}", cfg.description);
    }
    if !cfg.stacks.is_empty() {
        eprintln!("  stacks: {}", cfg.stacks.join(", "));
    }
    if !cfg.contract.design.is_empty() {
        log::warn!(
            "skipping {} design contract(s): style generation is not supported",
            cfg.contract.design.len()
        );
    }

    for contract in &cfg.contract.api {
        let spec = config::resolve_path(base, &contract.path);
        if !spec.is_file() {
            log::warn!("API spec {} does not exist, skipping", spec.display());
            continue;
        }
        eprintln!("Generating API client from {}", spec.display());

        let mut plan = GenApiConfig::new(&spec, base.join(MANIFEST_OUTPUT));
        plan.generate.selection = Selection::everything();
        plan.load = LoadOptions {
            skip_validation: true,
            errors_only: true,
        };
        run_generation(&plan)?;
    }

    eprintln!("All code generation completed for {}", cfg.name);
    Ok(())
}

fn cmd_inspect_api(spec: &Path, format: InspectFormat) -> Result<()> {
    let parsed = load_spec(spec, LoadOptions::default())
        .with_context(|| format!("failed to load {}", spec.display()))?;
    let ir = transform::transform(&parsed);
    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{yaml}");
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let schemas: Vec<serde_json::Value> = ir
        .schemas
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name,
                "source": s.original_name,
                "namespace": s.namespace,
                "kind": s.kind.tag(),
                "properties": s.properties.keys().collect::<Vec<_>>(),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "id": op.id,
                "method": op.method.as_str(),
                "path": op.path,
                "namespace": op.namespace,
                "entity": op.entity,
                "tags": op.tags,
                "deprecated": op.deprecated,
            })
        })
        .collect();

    let groups: Vec<serde_json::Value> = group_by_namespace(&ir.operations)
        .iter()
        .map(|group| {
            serde_json::json!({
                "name": group.name,
                "operations": group.operations.iter().map(|op| &op.id).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "servers": ir.servers.iter().map(|s| &s.url).collect::<Vec<_>>(),
        "schemas": schemas,
        "operations": operations,
        "namespaces": ir.namespaces,
        "groups": groups,
    })
}
