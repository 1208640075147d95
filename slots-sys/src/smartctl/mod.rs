// SPDX-License-Identifier: GPL-3.0-only

//! Health collection through the `smartctl` CLI
//!
//! Every invocation is bounded by a wall-clock timeout. A run that exceeds it
//! is killed and reaped before the lookup returns.

mod report;

pub use report::parse_report;

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use slots_contracts::HealthProbe;
use slots_types::{FreshnessFn, SmartInfo, assume_new};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, warn};

use crate::error::{Result, SysError};

/// Default bound on a single smartctl run.
pub const DEFAULT_SMART_TIMEOUT: Duration = Duration::from_secs(5);

/// smartctl exit status bit 1: device open failed.
const OPEN_FAILED_BIT: i32 = 1 << 1;

/// smartctl wrapper implementing [`HealthProbe`]
#[derive(Debug, Clone)]
pub struct SmartctlProbe {
    binary: PathBuf,
    timeout: Duration,
    freshness: FreshnessFn,
}

impl SmartctlProbe {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            freshness: assume_new,
        }
    }

    /// Replace the freshness classification applied to every report.
    pub fn with_freshness(mut self, freshness: FreshnessFn) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the configured binary resolves to an executable.
    pub fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    /// Run `smartctl -a <node> --json`.
    ///
    /// `Ok(None)` means smartctl could not open the device, which is an
    /// expected outcome for devices that do not support the query.
    pub async fn query(&self, device_node: &str) -> Result<Option<SmartInfo>> {
        let (status, stdout) = self.run(device_node).await?;

        if status
            .code()
            .is_some_and(|code| code & OPEN_FAILED_BIT != 0)
        {
            debug!("smartctl could not open {} ({})", device_node, status);
            return Ok(None);
        }

        parse_report(&stdout, self.freshness).map(Some)
    }

    async fn run(&self, device_node: &str) -> Result<(ExitStatus, Vec<u8>)> {
        let mut child = Command::new(&self.binary)
            .arg("-a")
            .arg(device_node)
            .arg("--json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SysError::OperationFailed(format!("Failed to execute {:?}: {}", self.binary, e))
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            SysError::OperationFailed("smartctl stdout was not captured".to_string())
        })?;

        let outcome = tokio::time::timeout(self.timeout, collect(&mut child, stdout)).await;
        match outcome {
            Ok(collected) => collected,
            Err(_) => {
                terminate(child, device_node);
                Err(SysError::Timeout {
                    command: "smartctl".to_string(),
                    device: device_node.to_string(),
                    after: self.timeout,
                })
            }
        }
    }
}

/// Send SIGKILL and reap in the background. A smartctl stuck in an ioctl on
/// an unresponsive disk exits only once that I/O returns.
fn terminate(mut child: Child, device_node: &str) {
    if let Err(e) = child.start_kill() {
        warn!("Failed to kill smartctl for {}: {}", device_node, e);
    }

    let device_node = device_node.to_string();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!("Reaped timed out smartctl for {} ({})", device_node, status),
            Err(e) => warn!("Failed to reap smartctl for {}: {}", device_node, e),
        }
    });
}

async fn collect(child: &mut Child, mut stdout: ChildStdout) -> Result<(ExitStatus, Vec<u8>)> {
    let mut output = Vec::new();
    stdout.read_to_end(&mut output).await?;
    let status = child.wait().await?;
    Ok((status, output))
}

#[async_trait]
impl HealthProbe for SmartctlProbe {
    async fn smart_info(&self, device_node: &str) -> Option<SmartInfo> {
        match self.query(device_node).await {
            Ok(info) => info,
            Err(e) => {
                warn!("No health info for {}: {}", device_node, e);
                None
            }
        }
    }
}
