//! Error types for helper invocation.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while invoking the switch helper.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// Neither a configured executable nor a bundled helper was found.
    #[error("switch helper not found - set `executable` or place ime-switcher.exe in {searched}")]
    HelperNotFound { searched: String },

    /// The helper process could not be started.
    #[error("failed to start switch helper: {0}")]
    Spawn(#[source] std::io::Error),

    /// The helper ran but reported failure.
    #[error("switch helper exited with {code:?}: {output}")]
    Exited { code: Option<i32>, output: String },

    /// The helper did not finish in time and was killed.
    #[error("switch helper timed out after {0:?}")]
    Timeout(Duration),
}

impl SwitchError {
    /// True when the failure means no helper is installed at all.
    pub fn is_helper_missing(&self) -> bool {
        matches!(self, SwitchError::HelperNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SwitchError>;
