// SPDX-License-Identifier: GPL-3.0-only

//! Live block/disk events from the udev netlink socket
//!
//! The socket is owned by a dedicated thread that blocks in `poll(2)`,
//! converts every event into an owned [`DeviceEvent`] and forwards it to a
//! [`ChannelFeed`]. The thread ends when the feed is dropped or the socket
//! fails; the feed then reports [`FeedPoll::Closed`].

use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use slots_contracts::{EventFeed, FeedPoll};
use slots_types::{DeviceAction, DeviceEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace};

use crate::devices::block_device_from_udev;
use crate::error::{Result, SysError};
use crate::feed::ChannelFeed;

pub struct UdevEventFeed {
    inner: ChannelFeed,
}

impl UdevEventFeed {
    /// Open the netlink subscription filtered to `block`/`disk` and start the
    /// reader thread. Events raised from this point on are queued.
    pub async fn subscribe() -> Result<Self> {
        let (tx, feed) = ChannelFeed::channel();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();

        thread::Builder::new()
            .name("udev-monitor".to_string())
            .spawn(move || {
                let socket = match open_socket() {
                    Ok(socket) => {
                        let _ = ready_tx.send(Ok(()));
                        socket
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                match pump_events(&socket, &tx) {
                    Ok(()) => debug!("Event consumer gone, stopping udev monitor"),
                    Err(e) => error!("udev monitor stopped: {}", e),
                }
            })?;

        ready_rx
            .await
            .map_err(|_| SysError::Feed("udev monitor thread exited during setup".to_string()))??;

        info!("Subscribed to udev block/disk events");
        Ok(Self { inner: feed })
    }
}

#[async_trait]
impl EventFeed for UdevEventFeed {
    async fn next_event(&mut self, wait: Duration) -> FeedPoll {
        self.inner.next_event(wait).await
    }
}

fn open_socket() -> Result<udev::MonitorSocket> {
    udev::MonitorBuilder::new()
        .and_then(|builder| builder.match_subsystem_devtype("block", "disk"))
        .and_then(|builder| builder.listen())
        .map_err(|e| SysError::Feed(format!("failed to open udev monitor: {e}")))
}

fn pump_events(
    socket: &udev::MonitorSocket,
    tx: &mpsc::UnboundedSender<DeviceEvent>,
) -> Result<()> {
    let fd = socket.as_raw_fd();

    loop {
        wait_readable(fd)?;

        for event in socket.iter() {
            let event = device_event(&event);
            trace!("udev {:?} for {}", event.action, event.device.devpath);

            if tx.send(event).is_err() {
                return Ok(());
            }
        }
    }
}

fn device_action(event_type: udev::EventType) -> DeviceAction {
    match event_type {
        udev::EventType::Add => DeviceAction::Add,
        udev::EventType::Remove => DeviceAction::Remove,
        udev::EventType::Change => DeviceAction::Change,
        other => DeviceAction::Other(format!("{other:?}").to_lowercase()),
    }
}

fn device_event(event: &udev::Event) -> DeviceEvent {
    DeviceEvent {
        action: device_action(event.event_type()),
        device: block_device_from_udev(&event.device()),
    }
}

fn wait_readable(fd: RawFd) -> Result<()> {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        // SAFETY: `pollfd` is a valid, exclusively borrowed array of length 1.
        let rc = unsafe { libc::poll(&mut pollfd, 1, -1) };
        if rc >= 0 {
            if pollfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
                return Err(SysError::Feed(format!(
                    "udev socket reported poll events {:#x}",
                    pollfd.revents
                )));
            }
            return Ok(());
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(SysError::Feed(format!("poll on udev socket failed: {err}")));
        }
    }
}
