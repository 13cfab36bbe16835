use std::fs;
use std::path::{Path, PathBuf};

use crate::GeneratedFile;
use crate::error::EmitError;

/// Write rendered files under `dir`, creating directories as needed and
/// overwriting existing files. Stops at the first failure; files already
/// written stay in place.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, EmitError> {
    fs::create_dir_all(dir).map_err(|source| EmitError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.path);
        if let Some(parent) = path.parent()
            && parent != dir
        {
            fs::create_dir_all(parent).map_err(|source| EmitError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.content).map_err(|source| EmitError::Write {
            path: path.clone(),
            source,
        })?;
        log::debug!("wrote {} ({} bytes)", path.display(), file.content.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn creates_directories_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("src/__generated__/api");

        let first = write_files(&out, &[file("client.ts", "old")]).unwrap();
        assert_eq!(first, vec![out.join("client.ts")]);

        write_files(&out, &[file("client.ts", "new"), file("nested/dto.ts", "x")]).unwrap();
        assert_eq!(fs::read_to_string(out.join("client.ts")).unwrap(), "new");
        assert_eq!(fs::read_to_string(out.join("nested/dto.ts")).unwrap(), "x");
    }

    #[test]
    fn unwritable_target_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_files(&blocker, &[file("client.ts", "")]).unwrap_err();
        assert!(matches!(err, EmitError::CreateDir { ref path, .. } if path == &blocker));
    }
}
