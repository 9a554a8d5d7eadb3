//! Path resolution helpers for the lister.
//!
//! Roots are resolved to absolute paths before the walk starts; the walk
//! itself only ever joins child names onto already-absolute directories.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve a possibly-relative root against the process working directory.
///
/// Purely lexical: `.` and `..` are folded, symlinks are left alone and
/// the path is not required to exist. A missing root surfaces later as
/// the first enumeration failure.
pub fn resolve_root(root: impl AsRef<Path>) -> io::Result<PathBuf> {
    let root = root.as_ref();
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(normalize(&absolute))
}

/// Fold `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir => result.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(s) => result.push(s),
            Component::Prefix(p) => result.push(p.as_os_str()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dot_components() {
        assert_eq!(normalize(Path::new("/a/./b")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/./../c/.")), PathBuf::from("/a/c"));
    }

    #[test]
    fn normalize_stops_at_root() {
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn absolute_roots_pass_through() {
        let resolved = resolve_root("/some/abs/path").unwrap();
        assert_eq!(resolved, PathBuf::from("/some/abs/path"));
    }

    #[test]
    fn relative_roots_anchor_to_cwd() {
        let resolved = resolve_root("some/rel/path").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel/path"));
    }
}
