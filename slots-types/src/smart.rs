// SPDX-License-Identifier: GPL-3.0-only

//! SMART (Self-Monitoring, Analysis and Reporting Technology) types
//!
//! Normalized health summary derived from the diagnostic tool's report.

use serde::{Deserialize, Serialize};

/// Overall health verdict. Serialized as the literal `"OK"` or `"POOR"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "POOR")]
    Poor,
}

impl Health {
    /// `Ok` only when the tool reported an explicit pass.
    pub fn from_passed(passed: Option<bool>) -> Self {
        match passed {
            Some(true) => Self::Ok,
            _ => Self::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Poor => "POOR",
        }
    }
}

/// Staleness classification of a drive.
///
/// Only `New` is produced today; the other variants are reserved vocabulary
/// for consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Freshness {
    New,
    Used,
    Old,
}

/// Derivation of [`Freshness`] from the rest of a [`SmartInfo`].
pub type FreshnessFn = fn(&SmartInfo) -> Freshness;

/// Default freshness policy.
pub fn assume_new(_info: &SmartInfo) -> Freshness {
    Freshness::New
}

/// SMART/health information for an occupied slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartInfo {
    /// Model family as reported by the tool, `"?"` when absent.
    pub model_family: String,

    /// Temperature in Celsius. Absent when neither the report nor an
    /// attribute table carried it; `-1` when a table exists without the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i64>,

    /// Power-on hours, `-1` when unknown.
    pub power_on_hours: i64,

    /// Power cycle count, `-1` when unknown.
    pub power_cycle_count: i64,

    /// Start/stop count, `-1` when unknown.
    pub start_stop_count: i64,

    pub health: Health,

    pub freshness: Freshness,
}
