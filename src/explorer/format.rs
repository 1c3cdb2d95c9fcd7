//! Human-readable sizes for tree rows and the filesystem usage summary.

use crate::api::FsUsage;

const UNITS: [&str; 3] = ["B", "KB", "MB"];

/// Format a byte count with binary units up to MB.
///
/// Bytes are printed without decimals, KB and MB with one. Anything from
/// 1 GiB upward stays in MB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0usize;
    let mut scale = 1u64;
    while unit < UNITS.len() - 1 && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", bytes as f64 / scale as f64, UNITS[unit])
    }
}

/// Bytes as megabytes with two decimals, e.g. `"1.50 MB"`.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Display strings for the filesystem usage panel.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSummary {
    pub total: String,
    pub used: String,
    pub free: String,
    pub percent: String,
    /// Used share clamped to `0.0..=1.0`, for gauges.
    pub ratio: f64,
}

impl From<&FsUsage> for UsageSummary {
    fn from(usage: &FsUsage) -> Self {
        let percent = usage.used_percent();
        Self {
            total: format_mb(usage.fs_total),
            used: format_mb(usage.fs_used),
            free: format_mb(usage.free()),
            percent: format!("{:.1}%", percent),
            ratio: (percent / 100.0).clamp(0.0, 1.0),
        }
    }
}
