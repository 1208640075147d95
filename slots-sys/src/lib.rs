// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system access for drive-slot inventory
//!
//! This crate talks to the three external data sources:
//! - the static alias configuration (`/etc/vdev_id.conf`)
//! - the udev device registry and its netlink event feed
//! - `smartctl` for per-device health
//!
//! Everything it returns is an owned value from `slots-types`; no udev handle
//! escapes the thread that created it.

pub mod alias;
pub mod devices;
pub mod error;
pub mod feed;
pub mod monitor;
pub mod smartctl;

pub use alias::{AliasTable, DEFAULT_ALIAS_CONFIG};
pub use devices::{UdevRegistry, read_attributes};
pub use error::{Result, SysError};
pub use feed::ChannelFeed;
pub use monitor::UdevEventFeed;
pub use smartctl::{DEFAULT_SMART_TIMEOUT, SmartctlProbe, parse_report};
