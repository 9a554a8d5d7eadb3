//! Entry classification.

use std::fmt;
use std::fs::FileType;
use std::os::unix::fs::FileTypeExt;

/// Kind of filesystem entry, as reported by a non-following stat.
///
/// Exactly one kind applies to any entry; symbolic links are classified
/// as links, never as their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
    SymbolicLink,
    Socket,
    Fifo,
    CharacterDevice,
    BlockDevice,
}

impl EntryKind {
    /// The lowercase tag recognized by kind filters.
    pub fn tag(&self) -> &'static str {
        match self {
            EntryKind::Directory => "directory",
            EntryKind::File => "file",
            EntryKind::SymbolicLink => "symboliclink",
            EntryKind::Socket => "socket",
            EntryKind::Fifo => "fifo",
            EntryKind::CharacterDevice => "characterdevice",
            EntryKind::BlockDevice => "blockdevice",
        }
    }

    /// Returns true if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Classify a raw `FileType` from a non-following stat.
    ///
    /// The symlink check runs first: a link's metadata reports only
    /// `is_symlink`, so the remaining arms see resolved kinds.
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_symlink() {
            Some(EntryKind::SymbolicLink)
        } else if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else if file_type.is_socket() {
            Some(EntryKind::Socket)
        } else if file_type.is_fifo() {
            Some(EntryKind::Fifo)
        } else if file_type.is_char_device() {
            Some(EntryKind::CharacterDevice)
        } else if file_type.is_block_device() {
            Some(EntryKind::BlockDevice)
        } else {
            None
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_lowercase_and_unique() {
        let kinds = [
            EntryKind::Directory,
            EntryKind::File,
            EntryKind::SymbolicLink,
            EntryKind::Socket,
            EntryKind::Fifo,
            EntryKind::CharacterDevice,
            EntryKind::BlockDevice,
        ];

        let tags: std::collections::HashSet<_> = kinds.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), kinds.len());
        for tag in tags {
            assert_eq!(tag, tag.to_lowercase());
        }
    }

    #[test]
    fn only_directories_are_dirs() {
        assert!(EntryKind::Directory.is_dir());
        assert!(!EntryKind::File.is_dir());
        assert!(!EntryKind::SymbolicLink.is_dir());
    }

    #[test]
    fn display_matches_tag() {
        assert_eq!(EntryKind::SymbolicLink.to_string(), "symboliclink");
        assert_eq!(EntryKind::BlockDevice.to_string(), "blockdevice");
    }
}
