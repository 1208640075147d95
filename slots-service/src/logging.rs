// SPDX-License-Identifier: GPL-3.0-only

//! Diagnostics go to stderr and, optionally, to a daily rolling file.
//! stdout carries the message stream and is never written by a layer here.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LoggingLevel, Settings};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_PREFIX: &str = "drive-slots.log";
const LOG_DIR_ENV: &str = "DRIVE_SLOTS_LOG_DIR";
const KEEP_DAYS: u64 = 7;

pub fn init(settings: &Settings) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(settings.log_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let Some(dir) = resolve_log_dir(settings.log_dir.as_deref()) else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return;
    };

    match file_writer(&dir) {
        Ok((writer, guard)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            // Keep the background writer alive for the whole process.
            let _ = LOG_GUARD.set(guard);
        }
        Err(e) => {
            eprintln!("drive-slots: failed to initialize file logging: {e:#}");
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
        }
    }
}

fn default_filter(level: LoggingLevel) -> EnvFilter {
    EnvFilter::new(level.as_directive())
}

fn resolve_log_dir(configured: Option<&Path>) -> Option<PathBuf> {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
}

fn file_writer(
    dir: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir).map_err(|e| {
        anyhow::anyhow!("create log directory failed: {} ({})", dir.display(), e)
    })?;

    let prefix = OsString::from(LOG_PREFIX);
    cleanup_old_logs(dir, &prefix, KEEP_DAYS);

    let appender = tracing_appender::rolling::daily(dir, &prefix);
    Ok(tracing_appender::non_blocking(appender))
}

fn cleanup_old_logs(dir: &Path, prefix: &OsString, keep_days: u64) {
    let cutoff = SystemTime::now().checked_sub(Duration::from_secs(keep_days * 24 * 60 * 60));
    let Some(cutoff) = cutoff else { return };

    let prefix = prefix.to_string_lossy();

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        // Only files produced by our appender.
        if !entry
            .file_name()
            .to_string_lossy()
            .starts_with(prefix.as_ref())
        {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|metadata| metadata.modified()) else {
            continue;
        };
        if modified >= cutoff {
            continue;
        }

        let _ = fs::remove_file(entry.path());
    }
}
