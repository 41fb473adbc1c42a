// Sandbox path resolver

use crate::executor::error::{ExecutorError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolves paths against a fixed root and rejects any path that escapes it.
///
/// Must be consulted before any read, write, or listing touches the
/// filesystem.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`. The root must exist; it is
    /// canonicalized once so later containment checks are symlink-safe.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;
        debug!(root = %root.display(), "sandbox initialized");
        Ok(Self { root })
    }

    /// The canonical sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a requested path to a canonical absolute path inside the
    /// sandbox, or fail with `PathEscape`.
    ///
    /// Relative paths are joined under the root. `.`/`..` components are
    /// normalized, symlinks in the existing prefix are resolved, and the
    /// result must be the root or a descendant of it. The target itself may
    /// not exist yet (write targets resolve through their deepest existing
    /// ancestor).
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let requested = Path::new(path);
        let joined = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.root.join(requested)
        };

        let normalized = normalize(&joined);
        let resolved = resolve_existing_prefix(&normalized)?;

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            debug!(requested = %path, resolved = %resolved.display(), "path escape rejected");
            Err(ExecutorError::PathEscape(resolved))
        }
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into the parent.
/// `..` at the filesystem root stays at the root, which then fails the
/// containment check.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Canonicalize the longest existing prefix of `path` (resolving symlinks)
/// and reattach the non-existing remainder.
fn resolve_existing_prefix(path: &Path) -> Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut remainder: Vec<std::ffi::OsString> = Vec::new();

    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                remainder.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => break,
        }
    }

    let mut resolved = std::fs::canonicalize(&existing)?;
    for part in remainder.iter().rev() {
        resolved.push(part);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_sandbox() -> (Sandbox, PathBuf) {
        let dir = std::env::temp_dir().join(format!("commandly-sandbox-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        (Sandbox::new(&dir).unwrap(), dir)
    }

    #[test]
    fn test_relative_path_resolves_under_root() {
        let (sandbox, _dir) = temp_sandbox();
        let resolved = sandbox.resolve("notes/todo.txt").unwrap();
        assert!(resolved.starts_with(sandbox.root()));
        assert!(resolved.ends_with("notes/todo.txt"));
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let (sandbox, _dir) = temp_sandbox();
        let result = sandbox.resolve("../../etc/passwd");
        assert!(matches!(result, Err(ExecutorError::PathEscape(_))));
    }

    #[test]
    fn test_absolute_path_outside_rejected() {
        let (sandbox, _dir) = temp_sandbox();
        // Exists and is readable by the process, but outside the root
        let result = sandbox.resolve("/etc/passwd");
        assert!(matches!(result, Err(ExecutorError::PathEscape(_))));
    }

    #[test]
    fn test_dotted_path_inside_root_accepted() {
        let (sandbox, dir) = temp_sandbox();
        std::fs::create_dir_all(dir.join("a")).unwrap();
        let resolved = sandbox.resolve("a/../b.txt").unwrap();
        assert_eq!(resolved, sandbox.root().join("b.txt"));
    }

    #[test]
    fn test_nonexistent_write_target_resolves() {
        let (sandbox, _dir) = temp_sandbox();
        let resolved = sandbox.resolve("new_dir/new_file.txt").unwrap();
        assert!(resolved.starts_with(sandbox.root()));
    }

    #[test]
    fn test_root_itself_resolves() {
        let (sandbox, _dir) = temp_sandbox();
        let resolved = sandbox.resolve(".").unwrap();
        assert_eq!(resolved, sandbox.root());
    }
}
