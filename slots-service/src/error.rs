// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use slots_contracts::SourceError;
use thiserror::Error;

/// Errors that stop the live monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("device event feed closed")]
    FeedClosed,

    #[error("failed to write message: {0}")]
    Emit(#[from] std::io::Error),

    #[error("device enumeration failed: {0}")]
    Snapshot(#[from] SourceError),
}

/// Errors loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("invalid settings in {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("invalid setting {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
