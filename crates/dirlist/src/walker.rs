//! Core async traversal engine.
//!
//! Walks the tree rooted at the configured directory, classifying every
//! entry and collecting the absolute paths that pass the filters. One
//! task runs per directory; the inspections of a directory's children
//! are all in flight at once, so sibling completion order is whatever
//! the underlying I/O delivers.
//!
//! Delivery is single-fire: the future returned by
//! [`DirectoryLister::collect`] resolves exactly once, with either the
//! complete list or the first fatal error. There is no partial delivery.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{join_all, BoxFuture};
use tokio::sync::oneshot;

use crate::filter::EntryFilter;
use crate::options::{Config, ListOptions, OptionsError};
use crate::{EntryKind, ListerError, ListerFs};

/// Async directory-contents lister, generic over any [`ListerFs`].
///
/// # Examples
/// ```ignore
/// use dirlist::{DirectoryLister, ListOptions, LocalFs};
/// use std::sync::Arc;
///
/// let lister = DirectoryLister::new(
///     Arc::new(LocalFs::new()),
///     ListOptions::new("/etc").kind("file").find(".conf"),
/// )?;
/// let paths = lister.collect().await?;
/// ```
pub struct DirectoryLister<F: ListerFs> {
    fs: Arc<F>,
    config: Config,
}

impl<F: ListerFs + 'static> DirectoryLister<F> {
    /// Validate `options` and build a lister.
    ///
    /// Configuration errors surface here, before any filesystem access;
    /// the root's existence is checked lazily by the walk itself.
    pub fn new(fs: Arc<F>, options: ListOptions) -> Result<Self, OptionsError> {
        Ok(Self {
            fs,
            config: options.validate()?,
        })
    }

    /// Walk the tree and collect every matching absolute path.
    ///
    /// Resolves exactly once. On the first enumeration or inspection
    /// failure the walk aborts, the error is returned, and paths
    /// collected up to that point are discarded.
    pub async fn collect(self) -> Result<Vec<PathBuf>, ListerError> {
        let (tx, rx) = oneshot::channel();
        let state = Arc::new(WalkState {
            filter: self.config.filter,
            results: Mutex::new(Vec::new()),
            outstanding: AtomicUsize::new(1),
            completion: Mutex::new(Some(tx)),
            aborted: AtomicBool::new(false),
        });

        tracing::debug!(root = %self.config.root.display(), "starting directory listing");
        tokio::spawn(process_dir(self.fs, state, self.config.root, 0));

        // The sender is guaranteed to fire: every directory task either
        // decrements the tracker to zero or delivers a failure first.
        let result = rx
            .await
            .unwrap_or_else(|_| Err(ListerError::Io("traversal ended without completing".into())));
        if let Ok(ref paths) = result {
            tracing::debug!(matches = paths.len(), "directory listing complete");
        }
        result
    }
}

/// Shared mutable state for one traversal invocation.
///
/// Owned by exactly one `collect()` call; concurrent invocations never
/// share a `WalkState`.
struct WalkState {
    filter: EntryFilter,
    /// Matching absolute paths, in classification order.
    results: Mutex<Vec<PathBuf>>,
    /// Directories whose children are still being enumerated or
    /// inspected, seeded with 1 for the root. Incremented before a
    /// subdirectory task is spawned, decremented when a directory's
    /// children are fully processed. Zero means the walk is complete.
    outstanding: AtomicUsize,
    /// Single-fire completion channel.
    completion: Mutex<Option<oneshot::Sender<Result<Vec<PathBuf>, ListerError>>>>,
    aborted: AtomicBool,
}

impl WalkState {
    /// Append a matching path. Never spans a suspension point.
    fn record(&self, path: PathBuf) {
        match self.results.lock() {
            Ok(mut results) => results.push(path),
            Err(_) => self.fail(ListerError::Io("results lock poisoned".into())),
        }
    }

    /// Deliver the final outcome, if nothing has been delivered yet.
    fn complete(&self, result: Result<Vec<PathBuf>, ListerError>) {
        if let Ok(mut slot) = self.completion.lock()
            && let Some(tx) = slot.take()
        {
            // The receiver may already be gone; nothing left to do then.
            let _ = tx.send(result);
        }
    }

    /// Record a fatal error. The first failure wins; every in-flight
    /// task winds down once it observes the flag.
    fn fail(&self, error: ListerError) {
        self.aborted.store(true, Ordering::SeqCst);
        self.complete(Err(error));
    }

    /// A directory's children are fully processed. Whoever drops the
    /// tracker to zero delivers the accumulated list.
    fn finish_dir(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            let results = match self.results.lock() {
                Ok(mut results) => std::mem::take(&mut *results),
                Err(_) => Vec::new(),
            };
            self.complete(Ok(results));
        }
    }
}

/// Process one directory: enumerate child names, inspect every child
/// concurrently, record the matches, and spawn a task per qualifying
/// subdirectory.
///
/// `child_depth` is the depth of this directory's children below the
/// root; the root task runs with 0.
fn process_dir<F: ListerFs + 'static>(
    fs: Arc<F>,
    state: Arc<WalkState>,
    dir: PathBuf,
    child_depth: usize,
) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        if state.aborted.load(Ordering::SeqCst) {
            return;
        }

        // Recursion stops one level past the largest requested depth;
        // entries at this level are still classified and filtered.
        let recurse = !state.filter.past_deepest(child_depth);

        let names = match fs.list_dir(&dir).await {
            Ok(names) => names,
            Err(error) => {
                state.fail(error);
                return;
            }
        };
        tracing::trace!(dir = %dir.display(), children = names.len(), "enumerated directory");

        // Every child inspection is issued at once; completions
        // interleave in I/O order.
        let children: Vec<Result<(String, PathBuf, EntryKind), ListerError>> =
            join_all(names.into_iter().map(|name| {
                let fs = Arc::clone(&fs);
                let path = dir.join(&name);
                async move {
                    let kind = fs.inspect(&path).await?;
                    Ok((name, path, kind))
                }
            }))
            .await;

        for child in children {
            if state.aborted.load(Ordering::SeqCst) {
                return;
            }
            let (name, path, kind) = match child {
                Ok(child) => child,
                Err(error) => {
                    state.fail(error);
                    return;
                }
            };

            if state.filter.matches(kind, child_depth, &name) {
                state.record(path.clone());
            }

            if kind.is_dir() && recurse {
                state.outstanding.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(process_dir(
                    Arc::clone(&fs),
                    Arc::clone(&state),
                    path,
                    child_depth + 1,
                ));
            }
        }

        state.finish_dir();
    })
}
