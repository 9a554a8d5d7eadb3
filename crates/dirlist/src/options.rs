//! Listing configuration and validation.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use regex::Regex;
use thiserror::Error;

use crate::filter::{EntryFilter, FindPattern};
use crate::paths;

/// Configuration errors, raised before any filesystem access.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("root must be a non-empty path")]
    EmptyRoot,
    #[error("cannot resolve root against the working directory: {0}")]
    Resolve(String),
    #[error("invalid find pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Options for a directory-contents listing.
///
/// `root` is required; every filter is optional and an absent filter
/// matches everything. Depths count path segments below the root, with
/// the root's direct children at depth 0.
///
/// # Examples
/// ```
/// use dirlist::ListOptions;
///
/// let options = ListOptions::new("/srv/data")
///     .depths([1, 3])
///     .kinds(["file", "symbolicLink"])
///     .find_pattern("1$");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    root: String,
    depths: Option<BTreeSet<usize>>,
    kinds: Option<HashSet<String>>,
    find: Option<FindSpec>,
}

/// A basename search as given, before pattern compilation.
#[derive(Debug, Clone)]
enum FindSpec {
    Substring(String),
    Pattern(String),
}

impl ListOptions {
    /// Start building options for the given root directory.
    ///
    /// A relative root is resolved against the process working directory
    /// during validation.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Restrict matches to a single depth.
    pub fn depth(self, depth: usize) -> Self {
        self.depths([depth])
    }

    /// Restrict matches to a set of depths. Accumulates across calls.
    pub fn depths(mut self, depths: impl IntoIterator<Item = usize>) -> Self {
        self.depths
            .get_or_insert_with(BTreeSet::new)
            .extend(depths);
        self
    }

    /// Restrict matches to a single entry-kind tag (case-insensitive).
    pub fn kind(self, tag: impl AsRef<str>) -> Self {
        self.kinds([tag])
    }

    /// Restrict matches to a set of entry-kind tags (case-insensitive).
    ///
    /// Recognized tags are `directory`, `file`, `symboliclink`, `socket`,
    /// `fifo`, `characterdevice` and `blockdevice`. Unrecognized tags are
    /// legal and simply never match.
    pub fn kinds(mut self, tags: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.kinds
            .get_or_insert_with(HashSet::new)
            .extend(tags.into_iter().map(|tag| tag.as_ref().to_lowercase()));
        self
    }

    /// Restrict matches to basenames containing this literal substring.
    pub fn find(mut self, needle: impl Into<String>) -> Self {
        self.find = Some(FindSpec::Substring(needle.into()));
        self
    }

    /// Restrict matches to basenames matching this regular expression.
    ///
    /// The pattern is compiled during validation; a malformed pattern is
    /// a configuration error.
    pub fn find_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.find = Some(FindSpec::Pattern(pattern.into()));
        self
    }

    /// Validate and normalize into an immutable traversal configuration.
    ///
    /// Fails fast, without touching the filesystem. The root's existence
    /// is not checked here; a missing or unreadable root surfaces as the
    /// first enumeration failure of the walk.
    pub(crate) fn validate(self) -> Result<Config, OptionsError> {
        if self.root.is_empty() {
            return Err(OptionsError::EmptyRoot);
        }
        let root = paths::resolve_root(&self.root)
            .map_err(|err| OptionsError::Resolve(err.to_string()))?;

        let find = match self.find {
            None => None,
            Some(FindSpec::Substring(needle)) => Some(FindPattern::Substring(needle)),
            Some(FindSpec::Pattern(pattern)) => {
                Some(FindPattern::Pattern(Regex::new(&pattern)?))
            }
        };

        Ok(Config {
            root,
            filter: EntryFilter {
                depths: self.depths,
                kinds: self.kinds,
                find,
            },
        })
    }
}

/// Normalized, immutable configuration for one traversal invocation.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub root: PathBuf,
    pub filter: EntryFilter,
}
