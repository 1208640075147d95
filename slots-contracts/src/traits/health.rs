// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

use slots_types::SmartInfo;

/// Health lookup for a single device node.
///
/// Implementations never fail: every problem (device cannot be opened, tool
/// timed out, unreadable report) degrades to `None`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn smart_info(&self, device_node: &str) -> Option<SmartInfo>;
}
