//! Path checks that keep lookups inside their base directory.
//!
//! Two flavours are provided. [`is_within_dir`] is purely lexical and works for paths
//! that do not exist yet, which is what name-based lookups need before touching the
//! disk. [`validate_path_within_sandbox`] resolves symlinks through the OS and is used
//! once a candidate file is known to exist.

use crate::error::{Result, SandboxedDirError};
use std::path::{Component, Path, PathBuf};

/// Sets secure permissions on a directory (Unix only).
pub async fn set_secure_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(|_e| SandboxedDirError::Permission {
                operation: "set secure permissions".to_string(),
                path: path.to_path_buf(),
            })?;
    }

    #[cfg(not(unix))]
    {
        if !path.exists() {
            return Err(SandboxedDirError::PathValidation {
                path: path.to_path_buf(),
                reason: "Directory does not exist".to_string(),
            });
        }
    }

    Ok(())
}

/// Rejects paths containing null bytes.
pub fn validate_file_path_security(path: &Path) -> Result<()> {
    if path.to_string_lossy().contains('\0') {
        return Err(SandboxedDirError::PathValidation {
            path: path.to_path_buf(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Resolves `.` and `..` components without consulting the filesystem.
///
/// A `..` that would climb above the first component of a relative path is kept,
/// so the result can still be compared against a base directory.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Returns true when `path`, after lexical normalization, stays inside `base`.
#[must_use]
pub fn is_within_dir(path: &Path, base: &Path) -> bool {
    if validate_file_path_security(path).is_err() {
        return false;
    }

    let base = normalize_lexically(base);
    let path = normalize_lexically(path);

    path != base && path.starts_with(&base)
}

/// Validates that an existing path resolves (symlinks included) inside the sandbox.
pub fn validate_path_within_sandbox(resolved_path: &Path, sandbox_base: &Path) -> Result<()> {
    let canonical_base =
        sandbox_base
            .canonicalize()
            .map_err(|e| SandboxedDirError::PathValidation {
                path: sandbox_base.to_path_buf(),
                reason: format!("Failed to resolve sandbox base: {e}"),
            })?;

    let canonical_path =
        resolved_path
            .canonicalize()
            .map_err(|e| SandboxedDirError::PathValidation {
                path: resolved_path.to_path_buf(),
                reason: format!("Failed to resolve path: {e}"),
            })?;

    if !canonical_path.starts_with(&canonical_base) {
        return Err(SandboxedDirError::PathValidation {
            path: resolved_path.to_path_buf(),
            reason: format!(
                "Path escapes sandbox: resolves to '{}' (outside '{}')",
                canonical_path.display(),
                canonical_base.display()
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_path_security() {
        assert!(validate_file_path_security(Path::new("file.svg")).is_ok());
        assert!(validate_file_path_security(Path::new("subdir/file.svg")).is_ok());
        assert!(validate_file_path_security(Path::new("file\0.svg")).is_err());
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/icons/foo/../edit.svg")),
            PathBuf::from("/icons/edit.svg")
        );
        assert_eq!(
            normalize_lexically(Path::new("/icons/./foo/copy.svg")),
            PathBuf::from("/icons/foo/copy.svg")
        );
        assert_eq!(
            normalize_lexically(Path::new("../edit.svg")),
            PathBuf::from("../edit.svg")
        );
        assert_eq!(normalize_lexically(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn test_is_within_dir() {
        let base = Path::new("/icons/foo");

        assert!(is_within_dir(Path::new("/icons/foo/copy.svg"), base));
        assert!(is_within_dir(Path::new("/icons/foo/sub/../copy.svg"), base));
        assert!(!is_within_dir(Path::new("/icons/foo/../edit.svg"), base));
        assert!(!is_within_dir(Path::new("/icons/foo/../../etc/passwd"), base));
        assert!(!is_within_dir(Path::new("/icons/foobar/edit.svg"), base));
        assert!(!is_within_dir(Path::new("/icons/foo/."), base));
        assert!(!is_within_dir(Path::new("/icons/foo/bad\0.svg"), base));
    }

    #[tokio::test]
    async fn test_validate_path_within_sandbox() {
        let temp_dir = tempfile::tempdir().unwrap();
        let base = temp_dir.path();

        let inside = base.join("edit.svg");
        std::fs::write(&inside, "<svg/>").unwrap();
        assert!(validate_path_within_sandbox(&inside, base).is_ok());

        let outside_temp = tempfile::tempdir().unwrap();
        let outside = outside_temp.path().join("outside.svg");
        std::fs::write(&outside, "<svg/>").unwrap();
        assert!(validate_path_within_sandbox(&outside, base).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outside_temp = tempfile::tempdir().unwrap();
        let outside = outside_temp.path().join("secret.svg");
        std::fs::write(&outside, "<svg/>").unwrap();

        let link = temp_dir.path().join("link.svg");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        assert!(is_within_dir(&link, temp_dir.path()));
        assert!(validate_path_within_sandbox(&link, temp_dir.path()).is_err());
    }
}
