/*!
 * Directory and file scanning functionality
 */

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ResultExt};
use crate::types::{FileContents, FileEntry, FileMap};
use crate::utils::{is_excluded_dir, relative_key};

/// Scanner statistics
#[derive(Debug, Clone, Default)]
pub struct ScannerStatistics {
    /// Number of files packed
    pub files_processed: usize,
    /// Number of files packed as text
    pub text_files: usize,
    /// Relative paths of files that could not be read
    pub unreadable_files: Vec<String>,
    /// Total bytes of packed text
    pub total_bytes: u64,
    /// Entries skipped because the walk could not list them
    pub walk_errors: usize,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Directory to package
    root: PathBuf,
    /// File to leave out of the walk (the generated script)
    skip_file: Option<PathBuf>,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Scanner statistics
    statistics: RefCell<ScannerStatistics>,
}

impl Scanner {
    /// Create a new scanner for `root`
    pub fn new(root: impl Into<PathBuf>, progress: Arc<ProgressBar>) -> Self {
        Self {
            root: root.into(),
            skip_file: None,
            progress,
            statistics: RefCell::new(ScannerStatistics::default()),
        }
    }

    /// Leave `path` out of the scan if it lies inside the root
    pub fn skip_file(mut self, path: &Path) -> Self {
        self.skip_file = fs::canonicalize(path).ok();
        self
    }

    /// Get scanner statistics
    pub fn get_statistics(&self) -> ScannerStatistics {
        self.statistics.borrow().clone()
    }

    /// Scan the root and return every file keyed by its relative path
    pub fn scan(&self) -> Result<FileMap> {
        let abs_root = fs::canonicalize(&self.root)
            .with_context(|| format!("resolving {}", self.root.display()))?;
        let root_name = abs_root
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        debug!(root = %abs_root.display(), "scanning source tree");

        let walker = WalkDir::new(&abs_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e));

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.progress
                        .suspend(|| warn!("Could not list directory entry: {}", e));
                    self.statistics.borrow_mut().walk_errors += 1;
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }
            if self.skip_file.as_deref() == Some(entry.path()) {
                debug!(path = %entry.path().display(), "skipping output file");
                continue;
            }

            let Some(key) = relative_key(&abs_root, &root_name, entry.path()) else {
                self.progress.suspend(|| {
                    warn!(
                        "Skipping {}: path is not valid UTF-8",
                        entry.path().display()
                    )
                });
                continue;
            };

            entries.push(self.process_file(entry.path(), key));
        }

        Ok(entries.into_iter().collect())
    }

    /// Read a single file, downgrading failures to an unreadable entry
    fn process_file(&self, abs_path: &Path, key: String) -> FileEntry {
        self.progress.inc(1);
        self.progress.set_message(display_name(&key));

        let contents = match read_text(abs_path) {
            Ok(text) => {
                let mut stats = self.statistics.borrow_mut();
                stats.text_files += 1;
                stats.total_bytes += text.len() as u64;
                FileContents::text(text)
            }
            Err(reason) => {
                self.progress.suspend(|| {
                    warn!("Could not read {}: {}", abs_path.display(), reason)
                });
                self.statistics
                    .borrow_mut()
                    .unreadable_files
                    .push(key.clone());
                FileContents::unreadable(reason)
            }
        };

        self.statistics.borrow_mut().files_processed += 1;

        FileEntry {
            path: key,
            contents,
        }
    }
}

/// Read a file and decode it as UTF-8
fn read_text(path: &Path) -> std::result::Result<String, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {}", e.utf8_error()))
}

/// Excluded directories are pruned; the walk root itself is never pruned
fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && is_excluded_dir(&entry.file_name().to_string_lossy())
}

/// Regular files, and symlinks that resolve to regular files
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Truncate long names to keep the progress line readable
fn display_name(key: &str) -> String {
    let count = key.chars().count();
    if count > 40 {
        let tail: String = key.chars().skip(count - 37).collect();
        format!("...{}", tail)
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("a/x.txt"), "a/x.txt");
        let long = format!("proj/{}", "d/".repeat(30));
        let shown = display_name(&long);
        assert!(shown.starts_with("..."));
        assert_eq!(shown.chars().count(), 40);
    }
}
