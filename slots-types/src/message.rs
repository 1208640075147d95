// SPDX-License-Identifier: GPL-3.0-only

//! Output stream messages and the consumer-side fold over them

use serde::{Deserialize, Serialize};

use crate::Slot;

/// One line of the output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Full snapshot; replaces the entire known slot set.
    #[serde(rename = "reportAll")]
    ReportAll { slots: Vec<Slot> },

    /// Single-slot delta; replaces only the named slot.
    #[serde(rename = "change")]
    Change { slot: Slot },
}

/// Slot list reconstructed from a message stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotView {
    slots: Vec<Slot>,
}

impl SlotView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `change` overwrites every entry with its slot id. A slot id the
    /// view has not seen is ignored until the next `reportAll` brings it in.
    pub fn apply(&mut self, message: Message) {
        match message {
            Message::ReportAll { slots } => self.slots = slots,
            Message::Change { slot } => {
                for existing in self.slots.iter_mut().filter(|s| s.slot_id == slot.slot_id) {
                    *existing = slot.clone();
                }
            }
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.slot_id == slot_id)
    }
}
