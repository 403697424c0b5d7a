/*!
 * treepack - Package a directory tree into a self-recreating script
 *
 * This library collects every file under a source root, embeds them as a
 * JSON archive in a generated shell script, and replays such archives back
 * onto the filesystem.
 */

pub mod archive;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;
pub mod types;
pub mod unpack;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use archive::{parse_script, render_script, Archive};
pub use clipboard::{ClipboardSink, CommandClipboard, NoopClipboard};
pub use config::Config;
pub use error::{Result, TreepackError};
pub use report::{PackReport, ReportFormat, Reporter};
pub use scanner::Scanner;
pub use types::{FileContents, FileEntry, FileMap};
pub use unpack::{replay_script, Unpacker};
pub use writer::ScriptWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
