//! Global error handling for treepack
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for treepack operations
#[derive(Error, Debug)]
pub enum TreepackError {
    /// The resolved source directory does not exist
    #[error("Source directory '{}' does not exist", .0.display())]
    MissingSourceDirectory(PathBuf),

    /// Clipboard-related errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed or unsupported archive
    #[error("Archive error: {0}")]
    Archive(String),

    /// Archive entry that would escape the destination directory
    #[error("Unsafe path in archive: {0}")]
    UnsafePath(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for treepack operations
pub type Result<T> = std::result::Result<T, TreepackError>;

/// Creates a TreepackError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::TreepackError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding path context to IO errors
pub trait ResultExt<T> {
    /// Prefix the error message with the given context
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            TreepackError::Io(io::Error::new(e.kind(), format!("{}: {}", context, e)))
        })
    }
}
