// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for drive-slot inventory
//!
//! This crate defines the single source of truth for every value that crosses
//! a component boundary:
//!
//! - **slots-sys**: produces `BlockDevice`, `DeviceEvent` and `SmartInfo`
//! - **slots-service**: composes them into `Slot`/`Drive` and emits `Message`s
//! - **consumers**: parse the JSON stream back into these types and fold it
//!   with `SlotView`
//!
//! Every value is built fresh for the message that carries it; nothing here is
//! cached or mutated across messages.

pub mod common;
pub mod device;
pub mod message;
pub mod slot;
pub mod smart;

pub use common::{bytes_to_pretty, format_temperature};
pub use device::{
    BlockDevice, DeviceAction, DeviceAttributes, DeviceEvent, UNKNOWN_ATTRIBUTE,
    VIRTUAL_DEVPATH_PREFIX,
};
pub use message::{Message, SlotView};
pub use slot::{Drive, DriveKind, Slot, UNALIASED_SLOT_ID};
pub use smart::{Freshness, FreshnessFn, Health, SmartInfo, assume_new};
