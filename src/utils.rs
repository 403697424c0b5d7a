/*!
 * Utility functions for treepack
 */

use std::path::{Component, Path};

use once_cell::sync::Lazy;

/// Directory names never descended into
pub static EXCLUDED_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // Rust build output
        "target",
    ]
});

/// Whether a directory with this name is skipped during the walk
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.iter().any(|&d| d == name)
}

/// Build the `/`-separated key for `path`, relative to the parent of `root`
///
/// The key always starts with `root_name`, so `a/x.txt` under a root named
/// `a` keeps its prefix. Returns `None` if `path` is not under `root` or
/// contains non UTF-8 components.
pub fn relative_key(root: &Path, root_name: &str, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts: Vec<&str> = Vec::new();
    if !root_name.is_empty() {
        parts.push(root_name);
    }
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => continue,
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
