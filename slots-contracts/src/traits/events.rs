// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;

use slots_types::DeviceEvent;

/// Result of one bounded wait on the live device feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPoll {
    Event(DeviceEvent),
    /// Nothing arrived within the wait.
    Silence,
    /// The feed is gone and will not produce further events.
    Closed,
}

#[async_trait]
pub trait EventFeed: Send {
    async fn next_event(&mut self, wait: Duration) -> FeedPoll;
}
