//! Small shared utilities for size rendering and diagnostics.

use chrono::{DateTime, Utc};
use std::path::Path;

/// Bytes per megabyte, the unit used at the configuration boundary.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Timestamp format used in diagnostic output.
pub const TRASH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Converts a capacity expressed in MB into bytes for accounting.
pub fn mb_to_bytes(mb: u64) -> u64 {
    mb * BYTES_PER_MB
}

/// Converts a byte count back to whole MB for the configuration boundary.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

/// Returns a user-safe, trimmed path string for logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Serializes a UTC datetime into the diagnostic timestamp format.
pub fn serialize_trash_time(time: DateTime<Utc>) -> String {
    time.format(TRASH_TIME_FORMAT).to_string()
}

/// Human readable size rendering for the `-used` report.
pub fn print_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut value = bytes as f64;
    let mut idx = 0usize;

    while value >= 1024.0 && idx < SUFFIXES.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    if idx == 0 {
        format!("{:.0} {}", value, SUFFIXES[idx])
    } else {
        format!("{:.1} {}", value, SUFFIXES[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mb_round_trip_truncates_partial_megabytes() {
        assert_eq!(mb_to_bytes(10), 10 * 1024 * 1024);
        assert_eq!(bytes_to_mb(mb_to_bytes(10)), 10);
        assert_eq!(bytes_to_mb(BYTES_PER_MB + 1), 1);
    }

    #[test]
    fn print_size_picks_sensible_suffixes() {
        assert_eq!(print_size(512), "512 B");
        assert_eq!(print_size(1024), "1.0 K");
        assert_eq!(print_size(1536 * 1024), "1.5 M");
    }
}
