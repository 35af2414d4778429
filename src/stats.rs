//! Host diagnostics for the dashboard: resource snapshot and log tail

use crate::error::{AdminError, Result};
use serde::Serialize;
use std::path::Path;
use sysinfo::{Disks, System};

/// Characters of log text returned by [`tail_log`]
pub const LOG_TAIL_CHARS: usize = 16_000;

/// Text returned when there is no log file to read
pub const NO_LOGS: &str = "No logs found yet.";

/// Point-in-time host resource snapshot
///
/// Sections the platform cannot provide are omitted from the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStats {
    pub version: String,
    pub os: String,
    /// Seconds since boot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<LoadAverage>,
}

/// Memory figures in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub total: u64,
    pub free: u64,
    pub available: u64,
    pub used: u64,
}

/// Root filesystem usage in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskStats {
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

/// 1, 5 and 15 minute load averages
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadAverage {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Collect a snapshot of the running host
///
/// Sections are `None` when sysinfo does not support the platform.
pub fn collect(version: &str) -> SystemStats {
    let mut sys = System::new();
    sys.refresh_memory();

    let supported = sysinfo::IS_SUPPORTED_SYSTEM;
    SystemStats {
        version: version.to_string(),
        os: os_name(),
        uptime: supported.then(System::uptime),
        memory: supported.then(|| memory_stats(&sys)).flatten(),
        disk: disk_usage(&Disks::new_with_refreshed_list(), Path::new("/")),
        cpu: supported.then(load_average).flatten(),
    }
}

fn os_name() -> String {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        other => other,
    }
    .to_string()
}

/// Memory figures from a refreshed [`System`]
///
/// `used` is `total - available`.
fn memory_stats(sys: &System) -> Option<MemoryStats> {
    let total = sys.total_memory();
    if total == 0 {
        return None;
    }
    let available = sys.available_memory();
    Some(MemoryStats {
        total,
        free: sys.free_memory(),
        available,
        used: total.saturating_sub(available),
    })
}

#[cfg(not(windows))]
fn load_average() -> Option<LoadAverage> {
    let load = System::load_average();
    Some(LoadAverage {
        load1: load.one,
        load5: load.five,
        load15: load.fifteen,
    })
}

// Windows has no load average; sysinfo reports zeros there.
#[cfg(windows)]
fn load_average() -> Option<LoadAverage> {
    None
}

/// Usage of the disk mounted at `mount`, or of the first disk listed
fn disk_usage(disks: &Disks, mount: &Path) -> Option<DiskStats> {
    let disk = disks
        .iter()
        .find(|d| d.mount_point() == mount)
        .or_else(|| disks.iter().next())?;

    let total = disk.total_space();
    let free = disk.available_space();
    tracing::debug!(mount = %disk.mount_point().display(), total, free, "disk usage");
    Some(DiskStats {
        total,
        free,
        used: total.saturating_sub(free),
    })
}

/// Last [`LOG_TAIL_CHARS`] characters of the dashboard log
///
/// Returns [`NO_LOGS`] when no log file is configured or it does not exist.
pub fn tail_log(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(NO_LOGS.to_string());
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(NO_LOGS.to_string()),
        Err(e) => {
            return Err(AdminError::Io(e).into());
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    Ok(last_chars(&text, LOG_TAIL_CHARS).to_string())
}

fn last_chars(text: &str, count: usize) -> &str {
    match text.char_indices().rev().nth(count.saturating_sub(1)) {
        Some((idx, _)) if count > 0 => &text[idx..],
        Some(_) => "",
        None => text,
    }
}
