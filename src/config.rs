/*!
 * Configuration handling for treepack
 */

use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::clipboard::{
    ClipboardSink, CommandClipboard, NoopClipboard, DEFAULT_CLIPBOARD_COMMAND,
};
use crate::error::{Result, TreepackError};

/// Name of the generated script, written to the current directory
pub const OUTPUT_FILE: &str = "create_tree.sh";

/// Environment variable selecting the clipboard command
pub const CLIPBOARD_ENV: &str = "TREEPACK_CLIPBOARD";

/// Subdirectory selected by `--src-only`
pub const SRC_DIR: &str = "src";

/// Command-line arguments for treepack
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "treepack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Package a directory tree into a self-recreating script",
    long_about = concat!(
        "Embeds every file under a directory into a generated shell script that recreates ",
        "the tree when run, writes it to create_tree.sh and copies it to the clipboard."
    )
)]
pub struct Args {
    /// Source root to package
    #[clap(default_value = ".")]
    pub source_root: String,

    /// Only process the src folder inside the source root
    #[clap(long)]
    pub src_only: bool,
}

/// Which clipboard sink to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardChoice {
    /// Pipe text into an external command
    Command(CommandClipboard),
    /// Discard clipboard writes
    Disabled,
}

impl Default for ClipboardChoice {
    fn default() -> Self {
        Self::Command(CommandClipboard::pbcopy())
    }
}

impl ClipboardChoice {
    /// Resolve the choice from the `TREEPACK_CLIPBOARD` value, if set
    ///
    /// An empty value falls back to the default pasteboard.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => Self::default(),
            Some(v) if v.eq_ignore_ascii_case("none") => Self::Disabled,
            Some(v) => match CommandClipboard::from_command_line(v) {
                Some(cmd) => Self::Command(cmd),
                None => {
                    warn!(
                        "{} is set but empty, using {}",
                        CLIPBOARD_ENV, DEFAULT_CLIPBOARD_COMMAND
                    );
                    Self::default()
                }
            },
        }
    }

    /// Read the choice from the process environment
    pub fn from_env() -> Self {
        let value = env::var(CLIPBOARD_ENV).ok();
        Self::from_env_value(value.as_deref())
    }

    /// Build the sink
    pub fn sink(&self) -> Box<dyn ClipboardSink> {
        match self {
            Self::Command(cmd) => Box::new(cmd.clone()),
            Self::Disabled => Box::new(NoopClipboard),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Source root to package
    pub source_root: PathBuf,

    /// Package only the `src` subdirectory of the source root
    pub src_only: bool,

    /// Generated script path
    pub output_file: PathBuf,

    /// Clipboard sink selection
    pub clipboard: ClipboardChoice,
}

impl Config {
    /// Create configuration from command-line arguments and the environment
    pub fn from_args(args: Args) -> Self {
        Self {
            source_root: PathBuf::from(args.source_root),
            src_only: args.src_only,
            output_file: PathBuf::from(OUTPUT_FILE),
            clipboard: ClipboardChoice::from_env(),
        }
    }

    /// Directory that will actually be packaged
    pub fn effective_source_dir(&self) -> PathBuf {
        if self.src_only {
            self.source_root.join(SRC_DIR)
        } else {
            self.source_root.clone()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let source_dir = self.effective_source_dir();
        if !source_dir.is_dir() {
            return Err(TreepackError::MissingSourceDirectory(source_dir));
        }

        // Check if output file directory exists
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                crate::bail!(Config, "Output directory not found: {}", parent.display());
            }
        }

        Ok(())
    }
}
