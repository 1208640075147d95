// SPDX-License-Identifier: GPL-3.0-only

pub mod devices;
pub mod events;
pub mod health;

pub use devices::DeviceRegistry;
pub use events::{EventFeed, FeedPoll};
pub use health::HealthProbe;
