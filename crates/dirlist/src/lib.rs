//! dirlist: filtered recursive directory-contents listing.
//!
//! Provides:
//! - **DirectoryLister**: Async recursive traversal collecting absolute
//!   paths, generic over `ListerFs`
//! - **ListOptions**: Validated listing configuration (root, depth set,
//!   kind set, basename search)
//! - **EntryKind**: Exhaustive classification of filesystem entries
//! - **LocalFs**: Host-filesystem backend on tokio
//! - **MemoryFs**: In-memory backend for testing and virtual trees
//!
//! The lister is generic over `ListerFs`, a minimal read-only filesystem
//! trait. Consumers implement `ListerFs` to adapt their own filesystem
//! layer; `LocalFs` covers the common case.
//!
//! # Examples
//! ```ignore
//! use dirlist::{DirectoryLister, ListOptions, LocalFs};
//! use std::sync::Arc;
//!
//! let options = ListOptions::new("/var/log")
//!     .kind("file")
//!     .find(".log");
//! let lister = DirectoryLister::new(Arc::new(LocalFs::new()), options)?;
//! let paths = lister.collect().await?;
//! ```

mod entry;
mod filter;
mod local;
mod memory;
mod options;
pub mod paths;
mod walker;

pub use entry::EntryKind;
pub use filter::FindPattern;
pub use local::LocalFs;
pub use memory::MemoryFs;
pub use options::{ListOptions, OptionsError};
pub use walker::DirectoryLister;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from filesystem operations during a listing.
#[derive(Debug, Clone, Error)]
pub enum ListerError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not a directory: {0}")]
    NotDirectory(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ListerError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => ListerError::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => ListerError::PermissionDenied(err.to_string()),
            ErrorKind::NotADirectory => ListerError::NotDirectory(err.to_string()),
            _ => ListerError::Io(err.to_string()),
        }
    }
}

/// Minimal read-only filesystem abstraction for the lister.
///
/// Implement this trait to adapt your project's filesystem layer
/// (VFS, real FS, archive contents, etc.) to `DirectoryLister`.
#[async_trait]
pub trait ListerFs: Send + Sync {
    /// List the child names of a directory (names only, non-recursive).
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, ListerError>;

    /// Classify the entry at `path` without following symbolic links.
    async fn inspect(&self, path: &Path) -> Result<EntryKind, ListerError>;
}

/// Any failure from [`list_directory`]: configuration or traversal.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Lister(#[from] ListerError),
}

/// List the host filesystem with the given options.
///
/// Convenience wrapper over [`DirectoryLister`] and [`LocalFs`].
pub async fn list_directory(options: ListOptions) -> Result<Vec<PathBuf>, Error> {
    let lister = DirectoryLister::new(Arc::new(LocalFs::new()), options)?;
    Ok(lister.collect().await?)
}
