//! Entry filter predicates.
//!
//! Each classified entry is checked against three independent predicates
//! (kind membership, depth membership, basename search) and recorded iff
//! all three hold. Absent filters always hold.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use crate::EntryKind;

/// Basename search: a literal substring or a compiled pattern.
#[derive(Debug, Clone)]
pub enum FindPattern {
    /// Matches basenames containing this literal substring.
    Substring(String),
    /// Matches basenames the pattern matches anywhere.
    Pattern(Regex),
}

impl FindPattern {
    /// Check a basename against the search. Never the full path.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            FindPattern::Substring(needle) => name.contains(needle.as_str()),
            FindPattern::Pattern(regex) => regex.is_match(name),
        }
    }
}

/// The normalized filter set for one traversal.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryFilter {
    /// Exact-match depth set; root's direct children are depth 0.
    pub depths: Option<BTreeSet<usize>>,
    /// Lowercase kind tags. Unrecognized tags are kept and never match.
    pub kinds: Option<HashSet<String>>,
    pub find: Option<FindPattern>,
}

impl EntryFilter {
    fn kind_matches(&self, kind: EntryKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(kind.tag()))
    }

    fn depth_matches(&self, depth: usize) -> bool {
        self.depths.as_ref().is_none_or(|depths| depths.contains(&depth))
    }

    fn name_matches(&self, name: &str) -> bool {
        self.find.as_ref().is_none_or(|find| find.matches(name))
    }

    /// Full predicate for an entry of `kind` named `name` at `depth`
    /// below the root.
    pub fn matches(&self, kind: EntryKind, depth: usize, name: &str) -> bool {
        self.kind_matches(kind) && self.depth_matches(depth) && self.name_matches(name)
    }

    /// True once `depth` lies beyond the largest requested depth.
    ///
    /// Used only to stop recursion: no entry below this level can satisfy
    /// the exact-match set any more. Depth is never a max-depth cap;
    /// requesting a single large depth still walks every level up to it.
    pub fn past_deepest(&self, depth: usize) -> bool {
        self.depths
            .as_ref()
            .and_then(|depths| depths.last())
            .is_some_and(|deepest| depth > *deepest)
    }
}
