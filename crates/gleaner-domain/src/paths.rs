//! Fail-closed path containment
//!
//! Item paths come from an externally authored configuration file and must
//! never reach outside the configured document root, no matter how many
//! `..` components or symlinks they contain.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A configured path could not be confined to the root.
///
/// Callers treat every variant the same way: the item has no usable file.
#[derive(Debug, Error)]
pub enum PathError {
    /// Root or candidate could not be canonicalized (missing file,
    /// invalid characters, broken symlink)
    #[error("path could not be resolved: {0}")]
    Resolve(#[from] std::io::Error),

    /// The canonical candidate lies outside the canonical root
    #[error("path escapes the document root: {0}")]
    Escape(PathBuf),
}

/// Resolve `relative` under `root`, guaranteeing containment.
///
/// Both the root and the joined candidate are canonicalized (symlinks
/// followed, `.`/`..` collapsed) before the containment check, so a
/// traversal like `../../etc/passwd` fails closed rather than resolving to
/// a path outside the document tree.
pub fn resolve_under_root(root: &Path, relative: &str) -> Result<PathBuf, PathError> {
    let root = root.canonicalize()?;
    let candidate = root.join(relative).canonicalize()?;

    if candidate.starts_with(&root) {
        Ok(candidate)
    } else {
        Err(PathError::Escape(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolves_plain_child() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.txt"), "x").unwrap();

        let resolved = resolve_under_root(dir.path(), "doc.txt").unwrap();
        assert!(resolved.ends_with("doc.txt"));
        assert!(resolved.starts_with(dir.path().canonicalize().unwrap()));
    }

    #[test]
    fn resolves_nested_child() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("doc.txt"), "x").unwrap();

        let resolved = resolve_under_root(dir.path(), "sub/doc.txt").unwrap();
        assert!(resolved.ends_with("doc.txt"));
    }

    #[test]
    fn dotdot_inside_root_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("doc.txt"), "x").unwrap();

        let resolved = resolve_under_root(dir.path(), "sub/../doc.txt").unwrap();
        assert!(resolved.ends_with("doc.txt"));
    }

    #[test]
    fn traversal_out_of_root_fails_closed() {
        let dir = tempfile::tempdir().unwrap();

        // /etc/passwd exists on the test hosts we care about; a missing
        // target fails via Resolve instead, which is equally closed.
        let result = resolve_under_root(dir.path(), "../../../../../../etc/passwd");
        assert!(result.is_err());
    }

    #[test]
    fn escape_via_sibling_directory_is_rejected() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(outer.path().join("secret.txt"), "x").unwrap();

        let result = resolve_under_root(&root, "../secret.txt");
        assert!(matches!(result, Err(PathError::Escape(_))));
    }

    #[test]
    fn missing_target_is_resolve_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_under_root(dir.path(), "no-such-file.docx");
        assert!(matches!(result, Err(PathError::Resolve(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_rejected() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        fs::create_dir(&root).unwrap();
        let target = outer.path().join("outside.txt");
        fs::write(&target, "x").unwrap();
        std::os::unix::fs::symlink(&target, root.join("link.txt")).unwrap();

        let result = resolve_under_root(&root, "link.txt");
        assert!(matches!(result, Err(PathError::Escape(_))));
    }
}
