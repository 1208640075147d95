// SPDX-License-Identifier: GPL-3.0-only

//! In-memory registry and health fakes shared by the unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use slots_contracts::{DeviceRegistry, HealthProbe, SourceError};
use slots_types::{BlockDevice, DeviceAttributes, Freshness, Health, SmartInfo};

pub(crate) fn disk(name: &str, slot_name: Option<&str>) -> BlockDevice {
    BlockDevice {
        devpath: format!("/devices/pci0000:00/0000:00:1f.2/ata1/host0/block/{name}"),
        devnode: Some(format!("/dev/{name}")),
        slot_name: slot_name.map(str::to_string),
        vdev_id: None,
        attributes: DeviceAttributes {
            path_by_path: Some(format!("/dev/disk/by-path/pci-0000:00:1f.2-ata-{name}")),
            capacity: 4_000_787_030_016,
            model: format!("MODEL-{name}"),
            serial: format!("SERIAL-{name}"),
            firmware_version: "SC60".to_string(),
            rotation_rate: 7200,
            partition_count: 1,
        },
    }
}

pub(crate) fn virtual_disk(name: &str) -> BlockDevice {
    BlockDevice {
        devpath: format!("/devices/virtual/block/{name}"),
        ..disk(name, Some("9-9"))
    }
}

pub(crate) fn smart_info() -> SmartInfo {
    SmartInfo {
        model_family: "Seagate IronWolf".to_string(),
        temperature: Some(34),
        power_on_hours: 12_000,
        power_cycle_count: 40,
        start_stop_count: 41,
        health: Health::Ok,
        freshness: Freshness::New,
    }
}

pub(crate) struct FakeRegistry {
    devices: Arc<Mutex<Result<Vec<BlockDevice>, SourceError>>>,
    calls: Arc<Mutex<usize>>,
}

impl FakeRegistry {
    pub(crate) fn with_devices(devices: Vec<BlockDevice>) -> Self {
        let registry = Self::default();
        registry.set_devices(devices);
        registry
    }

    pub(crate) fn set_devices(&self, devices: Vec<BlockDevice>) {
        *self.devices.lock().unwrap() = Ok(devices);
    }

    pub(crate) fn set_failure(&self, message: &str) {
        *self.devices.lock().unwrap() = Err(SourceError::unavailable(message));
    }

    pub(crate) fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Default for FakeRegistry {
    fn default() -> Self {
        Self {
            devices: Arc::new(Mutex::new(Ok(Vec::new()))),
            calls: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl DeviceRegistry for FakeRegistry {
    async fn list_disks(&self) -> Result<Vec<BlockDevice>, SourceError> {
        *self.calls.lock().unwrap() += 1;
        self.devices.lock().unwrap().clone()
    }
}

/// Answers for the configured device nodes, `None` for everything else.
#[derive(Default)]
pub(crate) struct FakeProbe {
    healthy: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeProbe {
    pub(crate) fn healthy<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            healthy: nodes.into_iter().map(Into::into).collect(),
            calls: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HealthProbe for FakeProbe {
    async fn smart_info(&self, device_node: &str) -> Option<SmartInfo> {
        self.calls.lock().unwrap().push(device_node.to_string());
        self.healthy.contains(device_node).then(smart_info)
    }
}
