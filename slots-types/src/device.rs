// SPDX-License-Identifier: GPL-3.0-only

//! Block device records as read from the OS device registry

use serde::{Deserialize, Serialize};

/// Kernel device paths under this prefix are virtual (loop, dm, ...) and never
/// occupy a physical bay.
pub const VIRTUAL_DEVPATH_PREFIX: &str = "/devices/virtual";

/// Fallback for identity attributes the registry does not carry.
pub const UNKNOWN_ATTRIBUTE: &str = "unknown";

const BY_PATH_PREFIX: &str = "/dev/disk/by-path/";

/// Identity and physical attributes of a disk, with fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceAttributes {
    /// First `/dev/disk/by-path/*` link of the device.
    pub path_by_path: Option<String>,

    /// Size in bytes (sector count × 512).
    pub capacity: u64,

    pub model: String,

    /// `ID_SERIAL_SHORT`, else `ID_SERIAL`, else `"unknown"`.
    pub serial: String,

    pub firmware_version: String,

    /// RPM, `0` for SSDs and unknown.
    pub rotation_rate: u32,

    pub partition_count: u32,
}

impl DeviceAttributes {
    /// Pick the first by-path link out of a device's symlinks.
    pub fn by_path_link<'a, I>(links: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        links
            .into_iter()
            .find(|link| link.starts_with(BY_PATH_PREFIX))
            .map(str::to_string)
    }
}

/// A disk-type block device currently known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDevice {
    /// Kernel device path (e.g. `/devices/pci0000:00/.../block/sda`).
    pub devpath: String,

    /// Device node (e.g. `/dev/sda`).
    pub devnode: Option<String>,

    /// `SLOT_NAME` property.
    pub slot_name: Option<String>,

    /// `ID_VDEV` property.
    pub vdev_id: Option<String>,

    pub attributes: DeviceAttributes,
}

impl BlockDevice {
    pub fn is_virtual(&self) -> bool {
        self.devpath.starts_with(VIRTUAL_DEVPATH_PREFIX)
    }

    /// Slot identifier carried by the device: `SLOT_NAME`, then `ID_VDEV`.
    pub fn slot_id(&self) -> Option<&str> {
        self.slot_name.as_deref().or(self.vdev_id.as_deref())
    }
}

/// Kernel event action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceAction {
    Add,
    Remove,
    Change,
    Other(String),
}

/// One event from the live device feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub action: DeviceAction,
    pub device: BlockDevice,
}
