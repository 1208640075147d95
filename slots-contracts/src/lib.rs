// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod traits;

pub use error::{SourceError, SourceErrorKind};
pub use traits::{DeviceRegistry, EventFeed, FeedPoll, HealthProbe};
