/*!
 * Script writer implementation for treepack
 */

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::clipboard::ClipboardSink;
use crate::error::{Result, ResultExt};

/// Result of handing a script to the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardOutcome {
    /// Copied through the named sink
    Copied(String),
    /// The sink is disabled
    Disabled,
    /// The sink was unavailable or failed
    Failed,
}

/// What happened when a script was emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Where the script was written
    pub output_file: PathBuf,
    /// Script size in bytes
    pub bytes: u64,
    /// Clipboard result
    pub clipboard: ClipboardOutcome,
}

/// Writes generated scripts and publishes them to the clipboard
pub struct ScriptWriter<'a> {
    output_file: PathBuf,
    clipboard: &'a dyn ClipboardSink,
}

impl<'a> ScriptWriter<'a> {
    /// Create a new script writer
    pub fn new(output_file: impl Into<PathBuf>, clipboard: &'a dyn ClipboardSink) -> Self {
        Self {
            output_file: output_file.into(),
            clipboard,
        }
    }

    /// Write the script to disk, mark it executable and copy it to the clipboard
    ///
    /// Only write failures are errors; a clipboard failure is logged and
    /// reflected in the returned [`Publication`].
    pub fn emit_and_publish(&self, script: &str) -> Result<Publication> {
        self.write(script)?;
        info!("Generated '{}' successfully.", self.output_file.display());

        let clipboard = self.publish(script);

        Ok(Publication {
            output_file: self.output_file.clone(),
            bytes: script.len() as u64,
            clipboard,
        })
    }

    /// Write the script and add the executable bit
    pub fn write(&self, script: &str) -> Result<()> {
        fs::write(&self.output_file, script)
            .with_context(|| format!("writing {}", self.output_file.display()))?;
        make_executable(&self.output_file)
    }

    /// Copy the script to the clipboard
    pub fn publish(&self, script: &str) -> ClipboardOutcome {
        if !self.clipboard.is_enabled() {
            info!("Clipboard disabled; the generated script was not copied.");
            return ClipboardOutcome::Disabled;
        }

        match self.clipboard.copy_text(script) {
            Ok(()) => {
                info!(
                    clipboard = %self.clipboard.name(),
                    "The generated script has been copied to the clipboard."
                );
                ClipboardOutcome::Copied(self.clipboard.name())
            }
            Err(e) => {
                warn!("Failed to copy the generated script to the clipboard: {}", e);
                ClipboardOutcome::Failed
            }
        }
    }
}

/// Add the owner-executable bit, keeping every existing permission bit
#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .with_context(|| format!("reading permissions of {}", path.display()))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    fs::set_permissions(path, permissions)
        .with_context(|| format!("setting permissions of {}", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
