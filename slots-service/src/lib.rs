// SPDX-License-Identifier: GPL-3.0-only

//! Drive-slot inventory service
//!
//! Builds the slot list from the alias table and the device registry, and in
//! live mode keeps it current from kernel device events, writing
//! newline-delimited JSON messages to stdout.

pub mod config;
pub mod emitter;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod resolver;
pub mod snapshot;
pub mod sources;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Args, LoggingLevel, OutputFormat, Settings};
pub use emitter::Emitter;
pub use error::{MonitorError, SettingsError};
pub use monitor::{ChangeMonitor, MonitorState};
pub use resolver::DriveResolver;
pub use snapshot::SnapshotBuilder;
pub use sources::Sources;
