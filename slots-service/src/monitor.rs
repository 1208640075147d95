// SPDX-License-Identifier: GPL-3.0-only

//! Live change monitor
//!
//! Two states: while `DrainingEvents` the monitor waits up to the refresh
//! window for the next device event and emits a `change` for each relevant
//! one. A silent window moves it to `Resyncing`, which emits exactly one
//! `reportAll` and returns to draining. The feed is injected, so the resync
//! trigger can be driven without a kernel.

use std::io::Write;
use std::time::Duration;

use slots_contracts::{EventFeed, FeedPoll};
use slots_types::{DeviceAction, DeviceEvent, Message, Slot};
use tracing::{debug, info, trace, warn};

use crate::emitter::Emitter;
use crate::error::MonitorError;
use crate::snapshot::{SnapshotBuilder, slot_id_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    DrainingEvents,
    Resyncing,
}

pub struct ChangeMonitor<F, W: Write> {
    feed: F,
    snapshot: SnapshotBuilder,
    emitter: Emitter<W>,
    refresh: Duration,
    state: MonitorState,
}

impl<F: EventFeed, W: Write> ChangeMonitor<F, W> {
    pub fn new(feed: F, snapshot: SnapshotBuilder, emitter: Emitter<W>, refresh: Duration) -> Self {
        Self {
            feed,
            snapshot,
            emitter,
            refresh,
            state: MonitorState::DrainingEvents,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn emitter(&self) -> &Emitter<W> {
        &self.emitter
    }

    /// Emit a full snapshot. A registry failure is returned to the caller
    /// and nothing is written.
    pub async fn report_all(&mut self) -> Result<(), MonitorError> {
        let slots = self.snapshot.build().await?;
        self.emitter.emit(&Message::ReportAll { slots })?;
        Ok(())
    }

    /// Runs until the feed closes or stdout goes away.
    pub async fn run(&mut self) -> Result<(), MonitorError> {
        info!(
            "Monitoring device events, full resync after {:?} of silence",
            self.refresh
        );
        loop {
            self.step().await?;
        }
    }

    /// Advance the state machine by one transition.
    pub async fn step(&mut self) -> Result<(), MonitorError> {
        match self.state {
            MonitorState::DrainingEvents => match self.feed.next_event(self.refresh).await {
                FeedPoll::Event(event) => {
                    if let Some(message) = self.classify(event).await {
                        self.emitter.emit(&message)?;
                    }
                }
                FeedPoll::Silence => {
                    debug!("No device events for {:?}, resyncing", self.refresh);
                    self.state = MonitorState::Resyncing;
                }
                FeedPoll::Closed => return Err(MonitorError::FeedClosed),
            },
            MonitorState::Resyncing => {
                match self.snapshot.build().await {
                    Ok(slots) => self.emitter.emit(&Message::ReportAll { slots })?,
                    Err(e) => warn!("Full resync skipped, device enumeration failed: {}", e),
                }
                self.state = MonitorState::DrainingEvents;
            }
        }
        Ok(())
    }

    /// Turn a device event into the `change` message it implies, if any.
    pub async fn classify(&self, event: DeviceEvent) -> Option<Message> {
        let DeviceEvent { action, device } = event;

        if device.is_virtual() {
            trace!("Ignoring event for virtual device {}", device.devpath);
            return None;
        }

        let Some(slot_id) = slot_id_for(&device, self.snapshot.include_non_aliased()) else {
            trace!("Ignoring event for {} without a slot id", device.devpath);
            return None;
        };

        let slot = match action {
            DeviceAction::Remove => Slot::empty(slot_id),
            DeviceAction::Add | DeviceAction::Change => {
                Slot::occupied(slot_id, self.snapshot.resolver().resolve(&device).await)
            }
            DeviceAction::Other(action) => {
                trace!("Ignoring {} event for {}", action, device.devpath);
                return None;
            }
        };

        debug!(
            "Slot {} now {}",
            slot.slot_id,
            if slot.is_empty() { "empty" } else { "occupied" }
        );
        Some(Message::Change { slot })
    }
}
