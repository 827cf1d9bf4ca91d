//! Error and warning types for rescopy.
//!
//! [`Error`] covers conditions that stop a run (or, for configuration
//! errors, a single target). [`Warning`] covers conditions the engine
//! reports and then steps past: they never abort a run.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | IO | [`Error::Read`], [`Error::Write`], [`Error::Walk`] |
//! | Matching | [`Error::Pattern`] |
//! | Configuration | [`Error::ConfigRead`], [`Error::ConfigParse`], [`Error::UnknownTarget`], [`Error::InvalidOption`], [`Error::InvalidRename`] |

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for rescopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or copying resources.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read a matched source file
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Source path
        path: String,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to write a destination file
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: String,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to enumerate a source directory
    #[error("Error while reading source: \"{path}\" {message}")]
    Walk {
        /// Directory being enumerated
        path: String,
        /// Description of the failure
        message: String,
    },

    /// A source pattern is not a valid glob
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Underlying error
        source: globset::Error,
    },

    /// The task file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The task file is not valid JSON or has the wrong shape
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// The requested target is not defined in the task file
    #[error("Target not found: {0}")]
    UnknownTarget(String),

    /// An option has a value of the wrong type
    #[error("Unsupported `{option}` type in target {target}: {expected} expected")]
    InvalidOption {
        /// Target name
        target: String,
        /// Option key
        option: String,
        /// Expected type
        expected: &'static str,
    },

    /// A rename regex failed to compile
    #[error("Invalid rename pattern {pattern:?} in target {target}: {source}")]
    InvalidRename {
        /// Target name
        target: String,
        /// The offending regex
        pattern: String,
        /// Underlying error
        source: regex::Error,
    },
}

impl Error {
    /// Whether this error rejects a single target or rule rather than the
    /// whole run.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOption { .. } | Self::InvalidRename { .. } | Self::Pattern { .. }
        )
    }
}

/// A recoverable condition reported during a run.
///
/// Warnings are passed to the warning handler as they occur and collected
/// in [`RunTotals::warnings`](crate::RunTotals::warnings).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
    /// A target or rule was rejected before any file was processed.
    Config {
        /// Target name, or the rule's `cwd` for a rule-level rejection
        scope: String,
        /// Rejection reason
        message: String,
    },
    /// A source expanded to zero usable files.
    NoFilesFound {
        /// The source path as resolved
        source: String,
    },
    /// A source directory could not be enumerated.
    ReadSource {
        /// The directory
        source: String,
        /// Description of the failure
        message: String,
    },
    /// Minification failed; the file was not written.
    Compression {
        /// Source file name
        file_name: String,
        /// Failure description
        message: String,
    },
    /// The worker pool could not be built; the run continued sequentially.
    ThreadPool(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { scope, message } => write!(f, "[{scope}] {message}"),
            Self::NoFilesFound { source } => {
                write!(f, "No such files found for \"{source}\". Check \"cwd\" option!")
            }
            Self::ReadSource { source, message } => {
                write!(f, "Error while reading source: \"{source}\" {message}")
            }
            Self::Compression { message, .. } => f.write_str(message),
            Self::ThreadPool(message) => {
                write!(f, "Failed to create thread pool ({message}), running sequentially")
            }
        }
    }
}
