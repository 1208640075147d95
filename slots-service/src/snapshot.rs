// SPDX-License-Identifier: GPL-3.0-only

//! Full slot list: alias table merged with the currently enumerated disks
//!
//! Aliased slots keep alias-table order for the whole process lifetime.
//! Slot ids carried by a device but absent from the table follow them, then
//! the unaliased drives in enumeration order.

use std::sync::Arc;

use slots_contracts::{DeviceRegistry, SourceError};
use slots_sys::AliasTable;
use slots_types::{BlockDevice, Slot, UNALIASED_SLOT_ID};
use tracing::{debug, trace};

use crate::resolver::DriveResolver;

/// Slot id an enumerated device or event belongs to, if it should be
/// reported at all.
pub(crate) fn slot_id_for(device: &BlockDevice, include_non_aliased: bool) -> Option<&str> {
    match device.slot_id() {
        Some(slot_id) => Some(slot_id),
        None if include_non_aliased => Some(UNALIASED_SLOT_ID),
        None => None,
    }
}

#[derive(Clone)]
pub struct SnapshotBuilder {
    aliases: Arc<AliasTable>,
    registry: Arc<dyn DeviceRegistry>,
    resolver: DriveResolver,
    include_non_aliased: bool,
}

impl SnapshotBuilder {
    pub fn new(
        aliases: AliasTable,
        registry: Arc<dyn DeviceRegistry>,
        resolver: DriveResolver,
        include_non_aliased: bool,
    ) -> Self {
        Self {
            aliases: Arc::new(aliases),
            registry,
            resolver,
            include_non_aliased,
        }
    }

    pub fn include_non_aliased(&self) -> bool {
        self.include_non_aliased
    }

    pub fn resolver(&self) -> &DriveResolver {
        &self.resolver
    }

    /// Enumerate and resolve every disk. Fails only when the registry
    /// itself cannot be read.
    pub async fn build(&self) -> Result<Vec<Slot>, SourceError> {
        let devices = self.registry.list_disks().await?;
        Ok(self.assemble(&devices).await)
    }

    /// Slot list for a one-off report. With `exclude_empty`, unoccupied
    /// slots are left out.
    pub async fn single_shot(&self, exclude_empty: bool) -> Result<Vec<Slot>, SourceError> {
        let mut slots = self.build().await?;
        if exclude_empty {
            slots.retain(|slot| !slot.is_empty());
        }
        Ok(slots)
    }

    pub async fn assemble(&self, devices: &[BlockDevice]) -> Vec<Slot> {
        let mut aliased: Vec<Slot> = self.aliases.slot_ids().iter().map(Slot::empty).collect();
        let mut unaliased = Vec::new();

        for device in devices {
            if device.is_virtual() {
                trace!("Skipping virtual device {}", device.devpath);
                continue;
            }

            let Some(slot_id) = slot_id_for(device, self.include_non_aliased) else {
                trace!("Skipping {} without a slot id", device.devpath);
                continue;
            };

            let drive = self.resolver.resolve(device).await;

            if device.slot_id().is_none() {
                unaliased.push(Slot::occupied(slot_id, drive));
                continue;
            }

            // Last enumerated device wins a contested slot.
            match aliased.iter_mut().find(|slot| slot.slot_id == slot_id) {
                Some(slot) => slot.drive = Some(drive),
                None => aliased.push(Slot::occupied(slot_id, drive)),
            }
        }

        debug!(
            "Snapshot: {} aliased slots, {} unaliased drives",
            aliased.len(),
            unaliased.len()
        );
        aliased.extend(unaliased);
        aliased
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{FakeProbe, FakeRegistry, disk, virtual_disk};

    use super::*;

    fn snapshot_builder(
        aliases: &[&str],
        devices: Vec<BlockDevice>,
        include_non_aliased: bool,
    ) -> (SnapshotBuilder, Arc<FakeRegistry>) {
        let registry = Arc::new(FakeRegistry::with_devices(devices));
        let probe = Arc::new(FakeProbe::healthy(["/dev/sda", "/dev/sdb", "/dev/sdc"]));
        let builder = SnapshotBuilder::new(
            aliases.iter().copied().collect(),
            registry.clone(),
            DriveResolver::new(probe),
            include_non_aliased,
        );
        (builder, registry)
    }

    fn ids(slots: &[Slot]) -> Vec<&str> {
        slots.iter().map(|slot| slot.slot_id.as_str()).collect()
    }

    fn node(slot: &Slot) -> Option<&str> {
        slot.drive.as_ref().map(|drive| drive.path.as_str())
    }

    #[tokio::test]
    async fn aliased_slots_follow_table_order() {
        let (builder, registry) = snapshot_builder(
            &["1-1", "1-2", "1-3"],
            vec![disk("sdc", Some("1-3")), disk("sda", Some("1-1"))],
            false,
        );

        let slots = builder.build().await.expect("snapshot");

        assert_eq!(ids(&slots), ["1-1", "1-2", "1-3"]);
        assert_eq!(node(&slots[0]), Some("/dev/sda"));
        assert_eq!(node(&slots[1]), None);
        assert_eq!(node(&slots[2]), Some("/dev/sdc"));
        assert_eq!(registry.calls(), 1);
    }

    #[tokio::test]
    async fn vdev_id_is_used_without_slot_name() {
        let mut device = disk("sdb", None);
        device.vdev_id = Some("1-2".to_string());
        let (builder, _) = snapshot_builder(&["1-1", "1-2"], vec![device], false);

        let slots = builder.build().await.expect("snapshot");
        assert_eq!(node(&slots[1]), Some("/dev/sdb"));
    }

    #[tokio::test]
    async fn last_device_wins_a_contested_slot() {
        let (builder, _) = snapshot_builder(
            &["1-1"],
            vec![disk("sda", Some("1-1")), disk("sdb", Some("1-1"))],
            false,
        );

        let slots = builder.build().await.expect("snapshot");
        assert_eq!(slots.len(), 1);
        assert_eq!(node(&slots[0]), Some("/dev/sdb"));
    }

    #[tokio::test]
    async fn unaliased_devices_are_opt_in() {
        let devices = vec![disk("sda", None), disk("sdb", Some("1-1"))];

        let (without, _) = snapshot_builder(&["1-1"], devices.clone(), false);
        assert_eq!(ids(&without.build().await.unwrap()), ["1-1"]);

        let (with, _) = snapshot_builder(&["1-1"], devices, true);
        let slots = with.build().await.unwrap();
        assert_eq!(ids(&slots), ["1-1", "unknown"]);
        assert_eq!(node(&slots[1]), Some("/dev/sda"));
    }

    #[tokio::test]
    async fn slot_ids_outside_the_table_follow_aliased_slots() {
        let (builder, _) = snapshot_builder(
            &["1-1"],
            vec![disk("sda", None), disk("sdb", Some("7-7"))],
            true,
        );

        let slots = builder.build().await.unwrap();
        assert_eq!(ids(&slots), ["1-1", "7-7", "unknown"]);
    }

    #[tokio::test]
    async fn virtual_devices_never_occupy_slots() {
        let (builder, _) = snapshot_builder(&["9-9"], vec![virtual_disk("loop0")], true);

        let slots = builder.build().await.unwrap();
        assert_eq!(slots, vec![Slot::empty("9-9")]);
    }

    #[tokio::test]
    async fn registry_failure_is_returned() {
        let (builder, registry) = snapshot_builder(&["1-1"], Vec::new(), false);
        registry.set_failure("udev unavailable");

        assert!(builder.build().await.is_err());
    }
}
