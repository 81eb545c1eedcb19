//! Project-root resolution, file-path resolution and the containment
//! check behind the 403 path.

use std::path::{Component, Path, PathBuf};
use std::process::Command;

/// Project root from `git rev-parse --show-toplevel`.
///
/// Computed once at startup and treated as read-only afterwards; `None`
/// when the working directory is not inside a git repository.
pub fn project_root() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8(output.stdout).ok()?;
    let root = root.trim();
    (!root.is_empty()).then(|| PathBuf::from(root))
}

/// Resolves a requested file: absolute paths pass through, relative ones
/// are joined under the project root when one is known. The result is
/// lexically normalized.
pub fn resolve_file(root: Option<&Path>, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        return normalize(path);
    }
    match root {
        Some(root) => normalize(&root.join(path)),
        None => normalize(path),
    }
}

/// Lexical normalization of `.` and `..` components, without touching the
/// filesystem. Traversal is caught even for paths that do not exist; `..`
/// above an absolute root is dropped, above a relative path it is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// True when `path` lies under `root`, component-wise.
pub fn contains(root: &Path, path: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

/// Renders `path` relative to the root when possible, for display and for
/// copy parity with the client's relative path mode.
pub fn relative_path(root: Option<&Path>, path: &Path) -> PathBuf {
    match root {
        Some(root) => path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_file_joined_under_root() {
        let root = Path::new("/repo");
        assert_eq!(
            resolve_file(Some(root), "src/a.ts"),
            PathBuf::from("/repo/src/a.ts")
        );
    }

    #[test]
    fn test_absolute_file_passes_through() {
        let root = Path::new("/repo");
        assert_eq!(
            resolve_file(Some(root), "/other/b.ts"),
            PathBuf::from("/other/b.ts")
        );
    }

    #[test]
    fn test_traversal_escapes_root() {
        let root = Path::new("/repo");
        let resolved = resolve_file(Some(root), "../../etc/passwd");
        assert_eq!(resolved, PathBuf::from("/etc/passwd"));
        assert!(!contains(root, &resolved));
    }

    #[test]
    fn test_containment_accepts_paths_under_root() {
        let root = Path::new("/repo");
        assert!(contains(root, Path::new("/repo/src/a.ts")));
        // Dot components inside the root do not break containment.
        assert!(contains(root, Path::new("/repo/src/../src/a.ts")));
    }

    #[test]
    fn test_containment_rejects_sibling_prefix() {
        // "/repo-other" shares a string prefix but is not under "/repo".
        assert!(!contains(Path::new("/repo"), Path::new("/repo-other/a.ts")));
    }

    #[test]
    fn test_normalize_keeps_leading_parent_of_relative_path() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_relative_path_strips_root() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_path(Some(root), Path::new("/repo/src/a.ts")),
            PathBuf::from("src/a.ts")
        );
        assert_eq!(
            relative_path(Some(root), Path::new("/other/a.ts")),
            PathBuf::from("/other/a.ts")
        );
    }
}
