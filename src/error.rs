//! Error taxonomy shared by the ports and the core operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filesystem failures reported by the [`FileSystem`](crate::ports::FileSystem) port.
///
/// Serializable so recorded cassettes can replay the exact failure kind.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FsError {
    /// The path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Offending path.
        path: String,
    },
    /// The path exists but is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// Offending path.
        path: String,
    },
    /// The process may not read or write the path.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Offending path.
        path: String,
    },
    /// The file is not valid UTF-8 text.
    #[error("not valid UTF-8: {path}")]
    InvalidUtf8 {
        /// Offending path.
        path: String,
    },
    /// Any other I/O failure.
    #[error("i/o error on {path}: {message}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

impl FsError {
    /// Classifies an `std::io::Error` raised while touching `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, err: &std::io::Error) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::InvalidData => Self::InvalidUtf8 { path },
            _ => Self::Io { path, message: err.to_string() },
        }
    }
}

/// Failures of the project scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root is not an `app/`-router project. Fatal.
    #[error("unsupported project layout at {root}: {reason}")]
    UnsupportedLayout {
        /// Project root that was scanned.
        root: String,
        /// Why the layout was rejected.
        reason: String,
    },
    /// Walking a source subtree failed. Fatal.
    #[error("failed to discover source files: {source}")]
    Discovery {
        /// Underlying filesystem error.
        #[source]
        source: FsError,
    },
    /// A discovered file could not be read. Per-file.
    #[error("unreadable file {path}: {source}")]
    UnreadableFile {
        /// Project-relative path.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: FsError,
    },
    /// A file could not be parsed. Per-file.
    #[error("unparsable file {path}: {reason}")]
    UnparsableFile {
        /// Project-relative path.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Failures loading `testforge.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config path.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: FsError,
    },
    /// The config file is not valid YAML for the expected schema.
    #[error("failed to parse config {path}: {message}")]
    Parse {
        /// Config path.
        path: String,
        /// Parser message.
        message: String,
    },
}

/// Failures of the coverage check.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// The coverage command could not be executed.
    #[error("failed to run coverage command `{command}`: {message}")]
    Command {
        /// Command line that was attempted.
        command: String,
        /// Executor error message.
        message: String,
    },
    /// The runner did not leave a summary file behind.
    #[error("coverage summary not found at {path}: {source}")]
    MissingSummary {
        /// Expected summary path.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: FsError,
    },
    /// The summary file does not have the expected shape.
    #[error("malformed coverage summary {path}: {message}")]
    MalformedSummary {
        /// Summary path.
        path: String,
        /// Parser message.
        message: String,
    },
}
