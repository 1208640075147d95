// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use slots_contracts::HealthProbe;
use slots_types::{BlockDevice, Drive};
use tracing::debug;

/// Joins registry attributes with the health lookup for one device.
///
/// Health lookup never fails resolution: any problem there is already folded
/// into `smart_info: None` by the probe.
#[derive(Clone)]
pub struct DriveResolver {
    health: Arc<dyn HealthProbe>,
}

impl DriveResolver {
    pub fn new(health: Arc<dyn HealthProbe>) -> Self {
        Self { health }
    }

    pub async fn resolve(&self, device: &BlockDevice) -> Drive {
        let smart_info = match device.devnode.as_deref() {
            Some(node) => self.health.smart_info(node).await,
            None => {
                debug!("{} has no device node, skipping health lookup", device.devpath);
                None
            }
        };

        Drive::compose(
            device.devnode.as_deref(),
            device.attributes.clone(),
            smart_info,
        )
    }
}
