// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::time::Duration;

use slots_contracts::{SourceError, SourceErrorKind};
use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("alias configuration {path:?} unreadable: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("device registry error: {0}")]
    Registry(String),

    #[error("device event feed error: {0}")]
    Feed(String),

    #[error("{command} on {device} timed out after {after:?}")]
    Timeout {
        command: String,
        device: String,
        after: Duration,
    },

    #[error("malformed output from {command}: {reason}")]
    MalformedOutput { command: String, reason: String },

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;

impl From<SysError> for SourceError {
    fn from(error: SysError) -> Self {
        let kind = match &error {
            SysError::Io(io) | SysError::Config { source: io, .. } => match io.kind() {
                std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
                std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
                _ => SourceErrorKind::Unavailable,
            },
            SysError::Registry(_) | SysError::Feed(_) | SysError::Timeout { .. } => {
                SourceErrorKind::Unavailable
            }
            SysError::MalformedOutput { .. } | SysError::OperationFailed(_) => {
                SourceErrorKind::Internal
            }
        };
        SourceError::new(kind, error.to_string())
    }
}
