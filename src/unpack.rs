/*!
 * Replays an archive onto the filesystem
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::archive::{parse_script, Archive};
use crate::clipboard::ClipboardSink;
use crate::error::{Result, ResultExt, TreepackError};
use crate::types::FileContents;

/// Outcome of an unpack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Directories that had to be created
    pub directories_created: Vec<PathBuf>,
    /// Files written, in archive order
    pub files_written: Vec<PathBuf>,
    /// Archive paths skipped because their contents were unreadable at pack time
    pub skipped: Vec<String>,
    /// Whether the script was copied back to the clipboard
    pub copied_to_clipboard: bool,
}

/// Writes archive entries below a destination directory
pub struct Unpacker {
    dest: PathBuf,
}

impl Unpacker {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }

    /// Recreate every entry of `archive` under the destination
    ///
    /// All paths are checked before anything is written, so an archive with
    /// one unsafe path leaves the destination untouched.
    pub fn unpack(&self, archive: &Archive) -> Result<UnpackSummary> {
        let targets = archive
            .entries
            .iter()
            .map(|entry| sanitize_path(&entry.path))
            .collect::<Result<Vec<_>>>()?;

        let mut summary = UnpackSummary::default();
        for (entry, rel) in archive.entries.iter().zip(targets) {
            let target = self.dest.join(&rel);

            let contents = match &entry.contents {
                FileContents::Text { contents } => contents,
                FileContents::Unreadable { reason } => {
                    warn!(
                        "Skipping {}: contents were not packed ({})",
                        entry.path, reason
                    );
                    summary.skipped.push(entry.path.clone());
                    continue;
                }
            };

            if let Some(parent) = rel.parent().filter(|p| !p.as_os_str().is_empty()) {
                let dir = self.dest.join(parent);
                if !dir.exists() {
                    fs::create_dir_all(&dir)
                        .with_context(|| format!("creating directory {}", dir.display()))?;
                    info!("Created directory: {}", parent.display());
                    summary.directories_created.push(dir);
                }
            }

            fs::write(&target, contents)
                .with_context(|| format!("writing {}", target.display()))?;
            info!("Created file: {}", rel.display());
            summary.files_written.push(target);
        }

        Ok(summary)
    }
}

/// Recreate the tree embedded in the script at `script_path`, then copy the
/// script's own text to the clipboard
///
/// Clipboard failure is logged and reported in the summary, never returned.
pub fn replay_script(
    script_path: &Path,
    dest: &Path,
    clipboard: &dyn ClipboardSink,
) -> Result<UnpackSummary> {
    let script = fs::read_to_string(script_path)
        .with_context(|| format!("reading {}", script_path.display()))?;
    let archive = parse_script(&script)?;

    let mut summary = Unpacker::new(dest).unpack(&archive)?;

    if !clipboard.is_enabled() {
        info!("Clipboard disabled; the script was not copied.");
        return Ok(summary);
    }

    match clipboard.copy_text(&script) {
        Ok(()) => {
            info!("The script's contents have been copied to the clipboard.");
            summary.copied_to_clipboard = true;
        }
        Err(e) => warn!("Failed to copy script to clipboard: {}", e),
    }

    Ok(summary)
}

/// Normalize an archive path, rejecting anything that could escape the
/// destination directory
pub fn sanitize_path(raw_path: &str) -> Result<PathBuf> {
    if raw_path.is_empty() {
        return Err(TreepackError::UnsafePath("empty path".to_string()));
    }

    let mut clean = PathBuf::new();
    for component in Path::new(raw_path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(TreepackError::UnsafePath(format!(
                    "absolute path not allowed: {}",
                    raw_path
                )));
            }
            Component::ParentDir => {
                return Err(TreepackError::UnsafePath(format!(
                    "parent directory traversal not allowed: {}",
                    raw_path
                )));
            }
            Component::CurDir => continue,
            Component::Normal(part) => clean.push(part),
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(TreepackError::UnsafePath(format!(
            "no file name in path: {}",
            raw_path
        )));
    }

    Ok(clean)
}
