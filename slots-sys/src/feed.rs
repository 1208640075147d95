// SPDX-License-Identifier: GPL-3.0-only

//! Channel-backed event feed
//!
//! Producers (the udev monitor thread, or a test) push owned events into an
//! unbounded channel; the consumer waits on it with a bounded timeout. Events
//! queue while the consumer is busy, so none are dropped between waits.

use std::time::Duration;

use async_trait::async_trait;
use slots_contracts::{EventFeed, FeedPoll};
use slots_types::DeviceEvent;
use tokio::sync::mpsc;

pub struct ChannelFeed {
    events: mpsc::UnboundedReceiver<DeviceEvent>,
}

impl ChannelFeed {
    pub fn new(events: mpsc::UnboundedReceiver<DeviceEvent>) -> Self {
        Self { events }
    }

    pub fn channel() -> (mpsc::UnboundedSender<DeviceEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl EventFeed for ChannelFeed {
    async fn next_event(&mut self, wait: Duration) -> FeedPoll {
        match tokio::time::timeout(wait, self.events.recv()).await {
            Ok(Some(event)) => FeedPoll::Event(event),
            Ok(None) => FeedPoll::Closed,
            Err(_) => FeedPoll::Silence,
        }
    }
}
