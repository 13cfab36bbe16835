use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::parse::bundle::bundle;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::OpenApiSpec;
use crate::parse::{self, DocumentFormat};
use crate::validate::{ValidationIssue, validate};

/// How strictly a document is checked on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Skip structural validation entirely.
    pub skip_validation: bool,
    /// Only surface fatal problems; 3.1 validation warnings are not logged.
    pub errors_only: bool,
}

/// Read, bundle, validate and resolve the document at `path`.
///
/// The returned spec is self-contained: external file references have been
/// imported and parameter, request body and response references inlined.
/// Schema references remain as local `#/components/schemas/*` pointers.
pub fn load_spec(path: &Path, options: LoadOptions) -> Result<OpenApiSpec, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_err = |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let raw = parse::parse_value(&text, DocumentFormat::from_path(path)).map_err(parse_err)?;
    let bundled = bundle(raw, path).map_err(|source| LoadError::Resolve {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = parse::from_value(bundled).map_err(parse_err)?;

    check(&spec, path, options)?;

    let resolved = RefResolver::new(&spec)
        .resolve_spec(&spec)
        .map_err(|source| LoadError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "loaded {} (OpenAPI {}, {} path(s))",
        path.display(),
        resolved.openapi,
        resolved.paths.len()
    );
    Ok(resolved)
}

/// Apply the validation policy: issues are fatal before 3.1 and warnings on
/// 3.1 documents, where type arrays and `null` types are expected.
pub fn check(spec: &OpenApiSpec, path: &Path, options: LoadOptions) -> Result<(), LoadError> {
    if options.skip_validation {
        if spec.is_v3_1() {
            log::info!("OpenAPI {} document: validation skipped", spec.openapi);
        }
        return Ok(());
    }

    let issues = validate(spec);
    if issues.is_empty() {
        return Ok(());
    }
    if spec.is_v3_1() {
        if !options.errors_only {
            report_warnings(spec, &issues);
        }
        return Ok(());
    }
    Err(LoadError::Validation {
        path: path.to_path_buf(),
        issues,
    })
}

fn report_warnings(spec: &OpenApiSpec, issues: &[ValidationIssue]) {
    log::warn!(
        "OpenAPI {} document has {} validation issue(s); continuing because 3.1 support is best-effort",
        spec.openapi,
        issues.len()
    );
    for issue in issues {
        log::warn!("  {issue}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_30: &str = r#"
openapi: 3.0.3
info: {title: t, version: '1'}
paths:
  /x:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: {type: [string, 'null']}
"#;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_spec(Path::new("/nonexistent/radas/api.yaml"), LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "api.json", "{ not json");
        let err = load_spec(&path, LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn validation_failure_is_fatal_before_3_1() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "api.yaml", INVALID_30);
        let err = load_spec(&path, LoadOptions::default()).unwrap_err();
        match err {
            LoadError::Validation { issues, .. } => assert_eq!(issues.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn skip_validation_accepts_invalid_3_0() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "api.yaml", INVALID_30);
        let options = LoadOptions {
            skip_validation: true,
            errors_only: false,
        };
        assert!(load_spec(&path, options).is_ok());
    }

    #[test]
    fn validation_failure_is_a_warning_on_3_1() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "api.yaml",
            &INVALID_30.replace("3.0.3", "3.1.0"),
        );
        for errors_only in [false, true] {
            let options = LoadOptions {
                skip_validation: false,
                errors_only,
            };
            let spec = load_spec(&path, options).unwrap();
            assert_eq!(spec.openapi, "3.1.0");
        }
    }
}
