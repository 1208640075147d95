// SPDX-License-Identifier: GPL-3.0-only

//! Slot and drive models
//!
//! These are the values serialized onto the output stream. Field names follow
//! the camelCase wire format consumed downstream.

use serde::{Deserialize, Serialize};

use crate::{DeviceAttributes, SmartInfo, UNKNOWN_ATTRIBUTE};

/// Slot id used for devices with no resolvable alias.
pub const UNALIASED_SLOT_ID: &str = "unknown";

const MANUFACTURER_PREFIXES: &[(&str, &str)] = &[
    ("ST", "Seagate"),
    ("WD", "Western Digital"),
    ("HGST", "HGST"),
    ("SAMSUNG", "Samsung"),
    ("TOSHIBA", "Toshiba"),
    ("HITACHI", "Hitachi"),
    ("INTEL", "Intel"),
    ("CRUCIAL", "Crucial"),
    ("KINGSTON", "Kingston"),
    ("ADATA", "ADATA"),
    ("SAN", "SanDisk"),
    ("PLEXTOR", "Plextor"),
    ("MICRON", "Micron"),
];

/// A physical bay and its current occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub slot_id: String,
    pub drive: Option<Drive>,
}

impl Slot {
    pub fn empty(slot_id: impl Into<String>) -> Self {
        Self {
            slot_id: slot_id.into(),
            drive: None,
        }
    }

    pub fn occupied(slot_id: impl Into<String>, drive: Drive) -> Self {
        Self {
            slot_id: slot_id.into(),
            drive: Some(drive),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.drive.is_none()
    }
}

/// Complete description of the disk occupying a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    /// Device node (e.g. "/dev/sda")
    pub path: String,

    /// `/dev/disk/by-path/*` link
    pub path_by_path: Option<String>,

    /// Capacity in bytes
    pub capacity: u64,

    pub model: String,

    pub serial: String,

    pub firmware_version: String,

    /// RPM if HDD, 0 if SSD or unknown
    pub rotation_rate: u32,

    pub partition_count: u32,

    /// `None` when the diagnostic tool could not (or did not in time) answer
    pub smart_info: Option<SmartInfo>,
}

impl Drive {
    /// Join registry attributes with the health lookup result.
    pub fn compose(
        devnode: Option<&str>,
        attributes: DeviceAttributes,
        smart_info: Option<SmartInfo>,
    ) -> Self {
        Self {
            path: devnode.unwrap_or(UNKNOWN_ATTRIBUTE).to_string(),
            path_by_path: attributes.path_by_path,
            capacity: attributes.capacity,
            model: attributes.model,
            serial: attributes.serial,
            firmware_version: attributes.firmware_version,
            rotation_rate: attributes.rotation_rate,
            partition_count: attributes.partition_count,
            smart_info,
        }
    }

    pub fn kind(&self) -> DriveKind {
        if self.rotation_rate > 0 {
            DriveKind::Hdd
        } else {
            DriveKind::Ssd
        }
    }

    /// Manufacturer guessed from the model prefix.
    pub fn manufacturer(&self) -> &'static str {
        let model = self.model.to_uppercase();
        MANUFACTURER_PREFIXES
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
            .map(|(_, name)| *name)
            .unwrap_or("Unknown Manufacturer")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKind {
    Hdd,
    Ssd,
}

impl DriveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hdd => "HDD",
            Self::Ssd => "SSD",
        }
    }
}
