//! Persisted trash configuration: capacity plus the ordered held-item list.
//!
//! The `.trashconfig` wire format is a plain newline-separated text file:
//! line 1 is the capacity in whole MB, every following line is one held
//! item's base name, oldest first. A missing or corrupt config must never
//! prevent the tool from functioning, so every load path falls back to
//! defaults instead of erroring.

use crate::fs::FileSystem;
use crate::helpers::{bytes_to_mb, mb_to_bytes};
use std::path::Path;
use tracing::debug;

/// Name of the managed trash directory inside the user's home directory.
pub const TRASH_DIRECTORY_NAME: &str = ".safetrash";

/// Name of the config file inside the trash directory.
pub const CONFIG_FILE_NAME: &str = ".trashconfig";

/// Name of the advisory lock file inside the trash directory.
pub const LOCK_FILE_NAME: &str = ".trashlock";

/// Capacity used when no config exists or its first line is malformed.
pub const DEFAULT_CAPACITY_MB: u64 = 10;

/// Smallest accepted capacity.
pub const MIN_CAPACITY_MB: u64 = 1;

/// Largest accepted capacity (10 GB).
pub const MAX_CAPACITY_MB: u64 = 10 * 1024;

/// Clamps a user- or file-supplied capacity into the accepted MB range.
pub fn clamp_capacity_mb(mb: i64) -> u64 {
    mb.clamp(MIN_CAPACITY_MB as i64, MAX_CAPACITY_MB as i64) as u64
}

/// In-memory mirror of the persisted `.trashconfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashConfig {
    /// Maximum permitted total size of held content, in bytes.
    pub capacity_bytes: u64,
    /// Base names of held items, oldest first.
    pub held_items: Vec<String>,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: mb_to_bytes(DEFAULT_CAPACITY_MB),
            held_items: Vec::new(),
        }
    }
}

impl TrashConfig {
    /// Parses config file contents.
    ///
    /// A malformed first line yields the default capacity and an empty item
    /// list; the stale item lines are not trustworthy once the header is.
    pub fn parse(contents: &str) -> Self {
        let mut lines = contents.lines();
        let capacity_mb = match lines.next().map(str::trim).map(str::parse::<i64>) {
            Some(Ok(mb)) => clamp_capacity_mb(mb),
            _ => return Self::default(),
        };

        let held_items = lines
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .collect();

        Self {
            capacity_bytes: mb_to_bytes(capacity_mb),
            held_items,
        }
    }

    /// Loads the config from disk, substituting defaults when the file is
    /// missing or unreadable.
    pub fn load<F: FileSystem>(fs: &F, config_path: &Path) -> Self {
        if !fs.exists(config_path) {
            debug!(path = %config_path.display(), "no trash config, using defaults");
            return Self::default();
        }
        match fs.read_to_string(config_path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                debug!(path = %config_path.display(), error = %err, "unreadable trash config, using defaults");
                Self::default()
            }
        }
    }

    /// Serializes to the wire format: capacity in whole MB, then one held
    /// item per line.
    pub fn serialize(&self) -> String {
        let mut out = bytes_to_mb(self.capacity_bytes).to_string();
        for item in &self.held_items {
            out.push('\n');
            out.push_str(item);
        }
        out.push('\n');
        out
    }

    /// Writes the config as a whole-file overwrite.
    pub fn save<F: FileSystem>(&self, fs: &F, config_path: &Path) -> crate::Result<()> {
        fs.write_to_string(config_path, &self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;

    #[test]
    fn parse_reads_capacity_and_items_in_order() {
        let config = TrashConfig::parse("50\nalpha.txt\nbeta.txt\n");
        assert_eq!(config.capacity_bytes, mb_to_bytes(50));
        assert_eq!(config.held_items, vec!["alpha.txt", "beta.txt"]);
    }

    #[test]
    fn malformed_capacity_falls_back_to_defaults_and_drops_items() {
        let config = TrashConfig::parse("not-a-number\nalpha.txt\n");
        assert_eq!(config, TrashConfig::default());
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(TrashConfig::parse(""), TrashConfig::default());
    }

    #[test]
    fn capacity_is_clamped_on_read() {
        let too_big = TrashConfig::parse("999999\n");
        assert_eq!(too_big.capacity_bytes, mb_to_bytes(MAX_CAPACITY_MB));

        let negative = TrashConfig::parse("-3\n");
        assert_eq!(negative.capacity_bytes, mb_to_bytes(MIN_CAPACITY_MB));

        let zero = TrashConfig::parse("0\n");
        assert_eq!(zero.capacity_bytes, mb_to_bytes(MIN_CAPACITY_MB));
    }

    #[test]
    fn serialize_then_parse_round_trips() {
        let config = TrashConfig {
            capacity_bytes: mb_to_bytes(25),
            held_items: vec!["old".to_string(), "new".to_string()],
        };
        assert_eq!(TrashConfig::parse(&config.serialize()), config);
    }

    #[test]
    fn load_of_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrashConfig::load(&RealFileSystem, &dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config, TrashConfig::default());
    }

    #[test]
    fn save_then_load_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = TrashConfig {
            capacity_bytes: mb_to_bytes(7),
            held_items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        config.save(&RealFileSystem, &path).unwrap();
        assert_eq!(TrashConfig::load(&RealFileSystem, &path), config);
    }
}
