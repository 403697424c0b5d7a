/*!
 * Clipboard support for treepack
 *
 * Text is handed to an external pasteboard command on its standard input.
 * Headless runs and tests use the no-op sink instead.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Default pasteboard command
pub const DEFAULT_CLIPBOARD_COMMAND: &str = "pbcopy";

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The command is not available on the system
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Destination for text copied to the clipboard
pub trait ClipboardSink {
    /// Human-readable name used in logs and reports
    fn name(&self) -> String;

    /// Copy text to the clipboard
    fn copy_text(&self, text: &str) -> Result<()>;

    /// Whether copies reach a real clipboard
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Clipboard backed by an external command reading from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Create a clipboard that pipes text into `program args...`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The platform pasteboard
    pub fn pbcopy() -> Self {
        Self::new(DEFAULT_CLIPBOARD_COMMAND, Vec::new())
    }

    /// Parse a whitespace-separated command line such as `xclip -selection clipboard`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::pbcopy()
    }
}

impl ClipboardSink for CommandClipboard {
    fn name(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn copy_text(&self, text: &str) -> Result<()> {
        if !command_exists(&self.program) {
            return Err(ClipboardError::CommandNotFound(self.program.clone()));
        }
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        execute_clipboard_command(&self.program, &args, text)
    }
}

/// Clipboard that accepts and discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClipboard;

impl ClipboardSink for NoopClipboard {
    fn name(&self) -> String {
        "none".to_string()
    }

    fn copy_text(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Check if a command exists on the system
///
/// Commands containing a path separator are checked directly; bare names are
/// looked up in `PATH`.
pub fn command_exists(command: &str) -> bool {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }

    match env::var_os("PATH") {
        Some(paths) => env::split_paths(&paths).any(|dir| dir.join(command).is_file()),
        None => false,
    }
}

/// Execute a command to copy text to clipboard
///
/// Spawns the process, writes the text to its stdin, closes stdin and waits
/// for the exit status.
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;

        stdin
            .write_all(text.as_bytes())
            .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}
