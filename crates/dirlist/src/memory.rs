//! In-memory filesystem backend.
//!
//! Stores one classification per normalized path, so every entry kind is
//! representable, including sockets, fifos and device nodes that cannot
//! be created unprivileged on a real filesystem. Used for testing and
//! for listing virtual trees.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::{paths, EntryKind, ListerError, ListerFs};

/// In-memory filesystem.
///
/// Thread-safe via internal `RwLock`. All data is lost when dropped.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: RwLock<HashMap<PathBuf, EntryKind>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty in-memory filesystem with a root directory at `/`.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(PathBuf::from("/"), EntryKind::Directory);
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Insert a node of the given kind, creating parent directories as
    /// needed. An existing node at the same path is replaced.
    pub fn add(&self, path: impl AsRef<Path>, kind: EntryKind) {
        let path = paths::normalize(path.as_ref());
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);

        let mut current = PathBuf::new();
        for component in path.parent().into_iter().flat_map(|p| p.components()) {
            current.push(component);
            nodes.entry(current.clone()).or_insert(EntryKind::Directory);
        }
        nodes.insert(path, kind);
    }

    /// Insert a directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.add(path, EntryKind::Directory);
    }

    /// Insert a regular file.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.add(path, EntryKind::File);
    }

    /// Insert a symbolic link. Links here are leaves: they are
    /// classified, never followed.
    pub fn add_symlink(&self, path: impl AsRef<Path>) {
        self.add(path, EntryKind::SymbolicLink);
    }
}

#[async_trait]
impl ListerFs for MemoryFs {
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, ListerError> {
        let normalized = paths::normalize(path);
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);

        match nodes.get(&normalized) {
            Some(EntryKind::Directory) => {}
            Some(_) => return Err(ListerError::NotDirectory(path.display().to_string())),
            None => return Err(ListerError::NotFound(path.display().to_string())),
        }

        let mut names: Vec<String> = nodes
            .keys()
            .filter(|candidate| candidate.parent() == Some(normalized.as_path()))
            .filter_map(|candidate| candidate.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        // Sort for consistent enumeration order.
        names.sort();
        Ok(names)
    }

    async fn inspect(&self, path: &Path) -> Result<EntryKind, ListerError> {
        let normalized = paths::normalize(path);
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);

        nodes
            .get(&normalized)
            .copied()
            .ok_or_else(|| ListerError::NotFound(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_creates_parent_directories() {
        let fs = MemoryFs::new();
        fs.add_file("/a/b/c.txt");

        assert_eq!(fs.inspect(Path::new("/a")).await.unwrap(), EntryKind::Directory);
        assert_eq!(fs.inspect(Path::new("/a/b")).await.unwrap(), EntryKind::Directory);
        assert_eq!(fs.inspect(Path::new("/a/b/c.txt")).await.unwrap(), EntryKind::File);
    }

    #[tokio::test]
    async fn list_returns_sorted_child_names() {
        let fs = MemoryFs::new();
        fs.add_file("/dir/charlie");
        fs.add_file("/dir/alpha");
        fs.add_dir("/dir/bravo");

        let names = fs.list_dir(Path::new("/dir")).await.unwrap();
        assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
    }

    #[tokio::test]
    async fn list_of_missing_path_is_not_found() {
        let fs = MemoryFs::new();
        let err = fs.list_dir(Path::new("/missing")).await.unwrap_err();
        assert!(matches!(err, ListerError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_of_a_file_is_not_a_directory() {
        let fs = MemoryFs::new();
        fs.add_file("/file.txt");

        let err = fs.list_dir(Path::new("/file.txt")).await.unwrap_err();
        assert!(matches!(err, ListerError::NotDirectory(_)));
    }

    #[tokio::test]
    async fn every_kind_is_representable() {
        let fs = MemoryFs::new();
        let nodes = [
            ("/k/dir", EntryKind::Directory),
            ("/k/file", EntryKind::File),
            ("/k/link", EntryKind::SymbolicLink),
            ("/k/sock", EntryKind::Socket),
            ("/k/pipe", EntryKind::Fifo),
            ("/k/tty", EntryKind::CharacterDevice),
            ("/k/disk", EntryKind::BlockDevice),
        ];

        for (path, kind) in nodes {
            fs.add(path, kind);
        }
        for (path, kind) in nodes {
            assert_eq!(fs.inspect(Path::new(path)).await.unwrap(), kind);
        }
        assert_eq!(fs.list_dir(Path::new("/k")).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn paths_are_normalized() {
        let fs = MemoryFs::new();
        fs.add_file("/a/b/file.txt");

        let kind = fs.inspect(Path::new("/a/./b/../b/file.txt")).await.unwrap();
        assert_eq!(kind, EntryKind::File);
    }
}
