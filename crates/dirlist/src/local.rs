//! Host-filesystem backend.
//!
//! Enumeration and inspection go through tokio's non-blocking fs
//! primitives. Classification uses a non-following stat, so symbolic
//! links are reported as links regardless of target.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::{EntryKind, ListerError, ListerFs};

/// Lister backend over the host filesystem.
///
/// Stateless; the lister only ever hands it absolute paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new host-filesystem backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ListerFs for LocalFs {
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, ListerError> {
        let mut names = Vec::new();
        let mut dir = fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        // Sort for consistent enumeration order.
        names.sort();
        Ok(names)
    }

    async fn inspect(&self, path: &Path) -> Result<EntryKind, ListerError> {
        let meta = fs::symlink_metadata(path).await?;
        EntryKind::from_file_type(meta.file_type())
            .ok_or_else(|| ListerError::Io(format!("unclassifiable entry: {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!("dirlist-local-{}-{}", std::process::id(), id))
    }

    async fn setup() -> PathBuf {
        let dir = temp_dir();
        let _ = fs::remove_dir_all(&dir).await;
        fs::create_dir_all(&dir).await.unwrap();
        dir
    }

    async fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn list_returns_sorted_child_names() {
        let dir = setup().await;
        fs::write(dir.join("bravo"), b"b").await.unwrap();
        fs::write(dir.join("alpha"), b"a").await.unwrap();
        fs::create_dir(dir.join("charlie")).await.unwrap();

        let names = LocalFs::new().list_dir(&dir).await.unwrap();
        assert_eq!(names, vec!["alpha", "bravo", "charlie"]);

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn classifies_files_directories_and_symlinks() {
        let dir = setup().await;
        fs::write(dir.join("file"), b"data").await.unwrap();
        fs::create_dir(dir.join("subdir")).await.unwrap();
        fs::symlink(dir.join("file"), dir.join("link")).await.unwrap();

        let local = LocalFs::new();
        assert_eq!(local.inspect(&dir.join("file")).await.unwrap(), EntryKind::File);
        assert_eq!(
            local.inspect(&dir.join("subdir")).await.unwrap(),
            EntryKind::Directory
        );
        assert_eq!(
            local.inspect(&dir.join("link")).await.unwrap(),
            EntryKind::SymbolicLink
        );

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn symlink_to_directory_is_still_a_link() {
        let dir = setup().await;
        fs::create_dir(dir.join("target")).await.unwrap();
        fs::symlink(dir.join("target"), dir.join("dirlink"))
            .await
            .unwrap();

        let kind = LocalFs::new().inspect(&dir.join("dirlink")).await.unwrap();
        assert_eq!(kind, EntryKind::SymbolicLink);

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn classifies_unix_sockets() {
        let dir = setup().await;
        let socket_path = dir.join("ipc.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket_path).unwrap();

        let kind = LocalFs::new().inspect(&socket_path).await.unwrap();
        assert_eq!(kind, EntryKind::Socket);

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let dir = setup().await;

        let err = LocalFs::new().inspect(&dir.join("ghost")).await.unwrap_err();
        assert!(matches!(err, ListerError::NotFound(_)));

        let err = LocalFs::new().list_dir(&dir.join("ghost")).await.unwrap_err();
        assert!(matches!(err, ListerError::NotFound(_)));

        cleanup(&dir).await;
    }
}
