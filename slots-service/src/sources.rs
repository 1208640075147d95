// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use slots_contracts::{DeviceRegistry, HealthProbe};
use slots_sys::{SmartctlProbe, UdevRegistry};
use tracing::{info, warn};

use crate::config::Settings;

/// The device and health sources the inventory reads from.
#[derive(Clone)]
pub struct Sources {
    registry: Arc<dyn DeviceRegistry>,
    health: Arc<dyn HealthProbe>,
}

impl Sources {
    pub fn new(registry: Arc<dyn DeviceRegistry>, health: Arc<dyn HealthProbe>) -> Self {
        Self { registry, health }
    }

    /// udev for devices, smartctl for health.
    pub fn build_default(settings: &Settings) -> Self {
        let probe = SmartctlProbe::new(settings.smartctl.clone(), settings.smart_timeout());
        if probe.is_available() {
            info!("Using {:?} for drive health", probe.binary());
        } else {
            warn!(
                "{:?} not found; drives will be reported without health data",
                probe.binary()
            );
        }

        Self::new(Arc::new(UdevRegistry::new()), Arc::new(probe))
    }

    pub fn registry(&self) -> Arc<dyn DeviceRegistry> {
        self.registry.clone()
    }

    pub fn health(&self) -> Arc<dyn HealthProbe> {
        self.health.clone()
    }
}
