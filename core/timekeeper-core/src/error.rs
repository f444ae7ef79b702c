//! Error types for timekeeper-core operations.
//!
//! The sync subsystem deliberately recovers from I/O and parse failures
//! in place (see `sync::file`), so these variants surface only from the
//! paths where the caller can actually act on them — config persistence
//! and explicit maintenance operations.

use std::path::PathBuf;

/// All errors that can occur in timekeeper-core operations.
#[derive(Debug, thiserror::Error)]
pub enum TimekeeperError {
    #[error("Config directory could not be determined")]
    ConfigDirUnavailable,

    #[error("Configuration write failed: {path}: {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using TimekeeperError.
pub type Result<T> = std::result::Result<T, TimekeeperError>;
