// SPDX-License-Identifier: GPL-3.0-only

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use slots_contracts::{DeviceRegistry, HealthProbe, SourceError};
use slots_service::{DriveResolver, SnapshotBuilder};
use slots_sys::AliasTable;
use slots_types::{BlockDevice, DeviceAttributes, Freshness, Health, SmartInfo};

pub fn disk(name: &str, slot_name: Option<&str>) -> BlockDevice {
    BlockDevice {
        devpath: format!("/devices/pci0000:00/0000:03:00.0/host0/port-0:{name}/block/{name}"),
        devnode: Some(format!("/dev/{name}")),
        slot_name: slot_name.map(str::to_string),
        vdev_id: None,
        attributes: DeviceAttributes {
            path_by_path: Some(format!("/dev/disk/by-path/pci-0000:03:00.0-sas-{name}")),
            capacity: 8_001_563_222_016,
            model: "WDC WD80EFZX-68UW8N0".to_string(),
            serial: format!("VK{}", name.to_uppercase()),
            firmware_version: "83.H0A83".to_string(),
            rotation_rate: 5400,
            partition_count: 2,
        },
    }
}

#[derive(Clone)]
pub struct FakeRegistry {
    devices: Arc<Mutex<Vec<BlockDevice>>>,
}

impl FakeRegistry {
    pub fn new(devices: Vec<BlockDevice>) -> Self {
        Self {
            devices: Arc::new(Mutex::new(devices)),
        }
    }

    pub fn set_devices(&self, devices: Vec<BlockDevice>) {
        *self.devices.lock().unwrap() = devices;
    }
}

#[async_trait]
impl DeviceRegistry for FakeRegistry {
    async fn list_disks(&self) -> Result<Vec<BlockDevice>, SourceError> {
        Ok(self.devices.lock().unwrap().clone())
    }
}

/// Healthy answer for listed nodes; `None` for the rest.
pub struct FakeProbe {
    healthy: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeProbe {
    pub fn new(healthy: &[&str]) -> Self {
        Self {
            healthy: healthy.iter().map(|node| node.to_string()).collect(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HealthProbe for FakeProbe {
    async fn smart_info(&self, device_node: &str) -> Option<SmartInfo> {
        self.calls.lock().unwrap().push(device_node.to_string());
        self.healthy.contains(device_node).then(|| SmartInfo {
            model_family: "Western Digital Red".to_string(),
            temperature: Some(31),
            power_on_hours: 23_456,
            power_cycle_count: 77,
            start_stop_count: 80,
            health: Health::Ok,
            freshness: Freshness::New,
        })
    }
}

pub fn snapshot_builder(
    aliases: AliasTable,
    registry: &FakeRegistry,
    probe: Arc<FakeProbe>,
    include_non_aliased: bool,
) -> SnapshotBuilder {
    SnapshotBuilder::new(
        aliases,
        Arc::new(registry.clone()),
        DriveResolver::new(probe),
        include_non_aliased,
    )
}
