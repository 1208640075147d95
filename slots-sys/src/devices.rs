// SPDX-License-Identifier: GPL-3.0-only

//! Disk enumeration through the udev device registry
//!
//! Only already-cached registry properties and sysfs attributes are read, so
//! enumeration never waits on a device.

use async_trait::async_trait;
use slots_contracts::{DeviceRegistry, SourceError};
use slots_types::{BlockDevice, DeviceAttributes, UNKNOWN_ATTRIBUTE};
use tracing::{debug, trace};

use crate::error::{Result, SysError};

const SECTOR_SIZE: u64 = 512;

/// Build the attribute record of a disk from its registry properties.
///
/// `property` looks up a udev property by name; `size_sectors` is the raw
/// `size` sysfs attribute.
pub fn read_attributes<F>(
    property: F,
    size_sectors: Option<&str>,
    partition_count: u32,
) -> DeviceAttributes
where
    F: Fn(&str) -> Option<String>,
{
    let devlinks = property("DEVLINKS").unwrap_or_default();

    DeviceAttributes {
        path_by_path: DeviceAttributes::by_path_link(devlinks.split_whitespace()),
        capacity: size_sectors
            .and_then(|size| size.trim().parse::<u64>().ok())
            .unwrap_or(0)
            .saturating_mul(SECTOR_SIZE),
        model: property("ID_MODEL").unwrap_or_else(|| UNKNOWN_ATTRIBUTE.to_string()),
        serial: property("ID_SERIAL_SHORT")
            .or_else(|| property("ID_SERIAL"))
            .unwrap_or_else(|| UNKNOWN_ATTRIBUTE.to_string()),
        firmware_version: property("ID_REVISION")
            .unwrap_or_else(|| UNKNOWN_ATTRIBUTE.to_string()),
        rotation_rate: property("ID_ATA_ROTATION_RATE_RPM")
            .and_then(|rpm| rpm.trim().parse().ok())
            .unwrap_or(0),
        partition_count,
    }
}

/// Convert a registry entry into an owned record.
pub(crate) fn block_device_from_udev(device: &udev::Device) -> BlockDevice {
    let property = |key: &str| {
        device
            .property_value(key)
            .map(|value| value.to_string_lossy().into_owned())
    };
    let size = device
        .attribute_value("size")
        .map(|value| value.to_string_lossy().into_owned());

    BlockDevice {
        devpath: device.devpath().to_string_lossy().into_owned(),
        devnode: device
            .devnode()
            .map(|node| node.to_string_lossy().into_owned()),
        slot_name: property("SLOT_NAME"),
        vdev_id: property("ID_VDEV"),
        attributes: read_attributes(property, size.as_deref(), count_partitions(device)),
    }
}

fn count_partitions(device: &udev::Device) -> u32 {
    match scan_partitions(device) {
        Ok(count) => count,
        Err(e) => {
            debug!("Partition scan failed for {:?}: {}", device.syspath(), e);
            0
        }
    }
}

fn scan_partitions(device: &udev::Device) -> std::io::Result<u32> {
    let mut enumerator = udev::Enumerator::new()?;
    enumerator.match_parent(device)?;
    enumerator.match_subsystem("block")?;

    let count = enumerator
        .scan_devices()?
        .filter(|child| child.devtype().is_some_and(|devtype| devtype == "partition"))
        .count();
    Ok(count as u32)
}

/// List every physical disk known to udev.
pub fn enumerate_disks() -> Result<Vec<BlockDevice>> {
    let mut enumerator = udev::Enumerator::new()
        .map_err(|e| SysError::Registry(format!("failed to create enumerator: {e}")))?;
    enumerator
        .match_subsystem("block")
        .map_err(|e| SysError::Registry(format!("failed to match subsystem: {e}")))?;
    enumerator
        .match_property("DEVTYPE", "disk")
        .map_err(|e| SysError::Registry(format!("failed to match device type: {e}")))?;

    let mut disks = Vec::new();
    for device in enumerator
        .scan_devices()
        .map_err(|e| SysError::Registry(format!("device scan failed: {e}")))?
    {
        let disk = block_device_from_udev(&device);
        if disk.is_virtual() {
            trace!("Skipping virtual device {}", disk.devpath);
            continue;
        }
        disks.push(disk);
    }

    debug!("Enumerated {} physical disks", disks.len());
    Ok(disks)
}

/// [`DeviceRegistry`] backed by udev.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdevRegistry;

impl UdevRegistry {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceRegistry for UdevRegistry {
    async fn list_disks(&self) -> std::result::Result<Vec<BlockDevice>, SourceError> {
        let disks = tokio::task::spawn_blocking(enumerate_disks)
            .await
            .map_err(|e| SysError::Registry(format!("enumeration task failed: {e}")))??;
        Ok(disks)
    }
}
