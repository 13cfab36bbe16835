use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Project manifest file name.
pub const CONFIG_FILE_NAME: &str = "radas.yml";

/// Environment variable naming the playground root contract paths resolve
/// against.
pub const PLAYGROUND_ENV: &str = "RADAS_PLAYGROUND";

const PLAYGROUND_PLACEHOLDER: &str = "${RADAS_PLAYGROUND}";

/// Top-level project manifest loaded from `radas.yml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RadasConfig {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub stacks: Vec<String>,
    pub contract: ContractConfig,
    pub frontend: FrontendConfig,
}

/// API and design contracts the project consumes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub api: Vec<ContractEntry>,
    pub design: Vec<ContractEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContractEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub contract_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub gen_api: GenApiDefaults,
}

/// Defaults for `fe gen-api`; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenApiDefaults {
    pub output: Option<String>,
    pub base_url: Option<String>,
    pub skip_validation: bool,
    pub validation_errors_only: bool,
}

/// Load a manifest. A directory path means `<dir>/radas.yml`.
pub fn load_config(path: &Path) -> Result<RadasConfig, ConfigError> {
    let path = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(RadasConfig::default());
    }
    serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// Find `radas.yml` in `start` or the nearest ancestor directory.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Resolve a contract path from the manifest in `base`, reading
/// `RADAS_PLAYGROUND` from the environment.
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let playground = std::env::var(PLAYGROUND_ENV).ok();
    resolve_path_with(base, path, playground.as_deref())
}

/// Resolve a contract path against an explicit playground root.
///
/// - `${RADAS_PLAYGROUND}` is substituted when the playground is set
/// - absolute paths are returned as-is
/// - relative paths join the playground if set, else `base`
pub fn resolve_path_with(base: &Path, path: &str, playground: Option<&str>) -> PathBuf {
    let playground = playground.filter(|p| !p.is_empty());

    if let Some(root) = playground
        && path.contains(PLAYGROUND_PLACEHOLDER)
    {
        return PathBuf::from(path.replacen(PLAYGROUND_PLACEHOLDER, root, 1));
    }

    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    match playground {
        Some(root) => Path::new(root).join(candidate),
        None => base.join(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
name: storefront
type: frontend
stacks: [react, vite]
contract:
  api:
    - path: contracts/openapi.yaml
      type: openapi
  design:
    - path: tokens.json
      type: tokens
frontend:
  gen_api:
    base_url: https://api.example.com
    skip_validation: true
"#;

    #[test]
    fn parses_manifest() {
        let config: RadasConfig = serde_yaml_ng::from_str(MANIFEST).unwrap();
        assert_eq!(config.name, "storefront");
        assert_eq!(config.project_type, "frontend");
        assert_eq!(config.stacks, vec!["react", "vite"]);
        assert_eq!(config.contract.api[0].path, "contracts/openapi.yaml");
        assert_eq!(config.contract.api[0].contract_type, "openapi");
        assert_eq!(config.contract.design.len(), 1);
        assert_eq!(
            config.frontend.gen_api.base_url.as_deref(),
            Some("https://api.example.com")
        );
        assert!(config.frontend.gen_api.skip_validation);
        assert!(!config.frontend.gen_api.validation_errors_only);
    }

    #[test]
    fn missing_sections_default() {
        let config: RadasConfig = serde_yaml_ng::from_str("name: bare").unwrap();
        assert!(config.contract.api.is_empty());
        assert_eq!(config.frontend, FrontendConfig::default());
    }

    #[test]
    fn load_from_directory_and_find_upwards() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), MANIFEST).unwrap();
        let nested = tmp.path().join("apps/web");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.name, "storefront");

        let found = find_config(&nested).unwrap();
        assert_eq!(found, tmp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn load_reports_missing_and_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = load_config(&tmp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));

        let bad = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&bad, "contract: [not, a, map]").unwrap();
        assert!(matches!(
            load_config(&bad).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn path_resolution() {
        let base = Path::new("/work/project");
        assert_eq!(
            resolve_path_with(base, "api.yaml", None),
            PathBuf::from("/work/project/api.yaml")
        );
        assert_eq!(
            resolve_path_with(base, "/abs/api.yaml", Some("/play")),
            PathBuf::from("/abs/api.yaml")
        );
        assert_eq!(
            resolve_path_with(base, "api.yaml", Some("/play")),
            PathBuf::from("/play/api.yaml")
        );
        assert_eq!(
            resolve_path_with(base, "${RADAS_PLAYGROUND}/svc/api.yaml", Some("/play")),
            PathBuf::from("/play/svc/api.yaml")
        );
        assert_eq!(
            resolve_path_with(base, "api.yaml", Some("")),
            PathBuf::from("/work/project/api.yaml")
        );
    }
}
