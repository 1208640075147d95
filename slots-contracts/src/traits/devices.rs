// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

use slots_types::BlockDevice;

use crate::SourceError;

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Disk-type block devices currently known, physical devices only.
    async fn list_disks(&self) -> Result<Vec<BlockDevice>, SourceError>;
}
