/*!
 * Core types and data structures for treepack
 */

use serde::{Deserialize, Serialize};

/// Contents recorded for a single packed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileContents {
    /// File decoded as UTF-8 text
    Text {
        /// Full file contents
        contents: String,
    },
    /// File that could not be read or decoded
    Unreadable {
        /// Why the file could not be packed
        reason: String,
    },
}

impl FileContents {
    /// Create a text entry
    pub fn text(contents: impl Into<String>) -> Self {
        Self::Text {
            contents: contents.into(),
        }
    }

    /// Create an unreadable entry
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::Unreadable {
            reason: reason.into(),
        }
    }

    /// Text view of the contents; unreadable files read as empty
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { contents } => contents,
            Self::Unreadable { .. } => "",
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }
}

/// A single file in a [`FileMap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// `/`-separated path, prefixed by the source root's own name
    pub path: String,
    /// File contents
    #[serde(flatten)]
    pub contents: FileContents,
}

/// Insertion-ordered mapping from relative path to file contents
///
/// Built once by the scanner and not modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: Vec<FileEntry>,
}

impl FileMap {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its relative path
    pub fn get(&self, path: &str) -> Option<&FileContents> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.contents)
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }

    /// Iterate over relative paths in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// Entries that could not be read
    pub fn unreadable(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| e.contents.is_unreadable())
    }

    /// Total size in bytes of the text contents
    pub fn text_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.contents.as_text().len() as u64)
            .sum()
    }
}

impl FromIterator<FileEntry> for FileMap {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileMap {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
