//! Error types for the coordinator crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::CoordinatorHandle`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    /// The worker task has exited (shutdown, or every handle dropped).
    #[error("coordinator worker has stopped")]
    WorkerStopped,
}

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
