//! The bounded trash store.
//!
//! A `Trash` is constructed fresh for each invocation: it creates the trash
//! directory if needed, takes the advisory lock, and loads the persisted
//! config. Callers mutate it in-process and call [`Trash::save`] exactly once
//! at the end. The filesystem is the source of truth for what bytes exist;
//! `held_items` is a best-effort oldest-first index that tolerates
//! out-of-band edits to the trash directory.

use crate::config::{
    clamp_capacity_mb, TrashConfig, CONFIG_FILE_NAME, LOCK_FILE_NAME, TRASH_DIRECTORY_NAME,
};
use crate::errors::TrashError;
use crate::fs::{home_directory, FileSystem, RealFileSystem};
use crate::helpers::{mb_to_bytes, sanitize_user_path, serialize_trash_time};
use crate::lock::ConfigLock;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Receipt returned by a successful move-in.
#[derive(Debug, Clone)]
pub struct TrashedItem {
    pub original_path: PathBuf,
    pub trashed_path: PathBuf,
    pub size_bytes: u64,
    pub deleted_at: DateTime<Utc>,
}

/// Capacity-bounded holding area for files removed by the delete command.
#[derive(Debug)]
pub struct Trash<F: FileSystem = RealFileSystem> {
    capacity_bytes: u64,
    trash_path: PathBuf,
    config_path: PathBuf,
    held_items: Vec<String>,
    verbose: bool,
    fs: F,
    _lock: ConfigLock,
}

impl Trash<RealFileSystem> {
    /// Opens the default trash directory inside the user's home directory.
    pub fn open_default() -> crate::Result<Self> {
        Self::open_in(home_directory(), RealFileSystem)
    }
}

impl<F: FileSystem> Trash<F> {
    /// Opens (creating if needed) the trash directory under `base_dir`,
    /// acquires the advisory lock, and loads the persisted config.
    pub fn open_in(base_dir: impl Into<PathBuf>, fs: F) -> crate::Result<Self> {
        let trash_path = base_dir.into().join(TRASH_DIRECTORY_NAME);
        let config_path = trash_path.join(CONFIG_FILE_NAME);
        fs.create_dir_all(&trash_path)?;
        let lock = ConfigLock::acquire(&trash_path.join(LOCK_FILE_NAME))?;
        let config = TrashConfig::load(&fs, &config_path);
        Ok(Self {
            capacity_bytes: config.capacity_bytes,
            trash_path,
            config_path,
            held_items: config.held_items,
            verbose: false,
            fs,
            _lock: lock,
        })
    }

    /// Enables diagnostic logging of individual operations.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    pub fn trash_path(&self) -> &Path {
        &self.trash_path
    }

    pub fn held_items(&self) -> &[String] {
        &self.held_items
    }

    /// Updates the capacity, clamping into the accepted MB range. The new
    /// bound applies from the next move-in; no immediate eviction.
    pub fn set_capacity_mb(&mut self, mb: i64) {
        self.capacity_bytes = mb_to_bytes(clamp_capacity_mb(mb));
        if self.verbose {
            info!(capacity_bytes = self.capacity_bytes, "trash capacity updated");
        }
    }

    /// Moves a single file into the trash, then evicts down to capacity.
    ///
    /// Directories are rejected; the recursive variant in the CLI layer
    /// decomposes them into single-file move-ins. A base-name collision with
    /// an item already in the trash overwrites it (last mover wins).
    pub fn move_in(&mut self, path: &Path) -> crate::Result<TrashedItem> {
        if !self.fs.exists(path) {
            return Err(TrashError::invalid_path(sanitize_user_path(path)));
        }
        let resolved = self
            .fs
            .canonicalize(path)
            .map_err(|_| TrashError::invalid_path(sanitize_user_path(path)))?;
        let metadata = self.fs.metadata(&resolved)?;
        if metadata.is_dir() {
            return Err(TrashError::IsDirectory(resolved));
        }
        let size_bytes = metadata.len();
        if size_bytes > self.capacity_bytes {
            return Err(TrashError::ExceedsCapacity {
                path: resolved,
                size: size_bytes,
                capacity: self.capacity_bytes,
            });
        }
        let name = resolved
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| TrashError::invalid_path(sanitize_user_path(&resolved)))?;

        let trashed_path = self.trash_path.join(&name);
        self.fs.rename(&resolved, &trashed_path)?;

        // The rename overwrote any same-named item, so its old queue entry
        // is stale.
        self.held_items.retain(|item| item != &name);
        self.held_items.push(name);

        let item = TrashedItem {
            original_path: resolved,
            trashed_path,
            size_bytes,
            deleted_at: Utc::now(),
        };
        if self.verbose {
            info!(
                original = %sanitize_user_path(&item.original_path),
                size_bytes = item.size_bytes,
                deleted_at = %serialize_trash_time(item.deleted_at),
                "moved file into trash"
            );
        }
        self.evict_to_capacity()?;
        Ok(item)
    }

    /// Evicts oldest-first until total size is back within capacity.
    ///
    /// Entries whose files are already gone are skipped and later dropped
    /// from the queue. The loop terminates once a pass finds nothing left to
    /// delete, even if the accounting and the directory have diverged.
    pub fn evict_to_capacity(&mut self) -> crate::Result<()> {
        let mut cursor = 0usize;
        let mut last_evicted: Option<usize> = None;

        while self.space_used()? > self.capacity_bytes {
            let found = self
                .held_items
                .iter()
                .enumerate()
                .skip(cursor)
                .find(|(_, name)| self.fs.exists(&self.trash_path.join(name.as_str())))
                .map(|(index, name)| (index, name.clone()));

            let Some((index, name)) = found else {
                warn!("trash is over capacity but no tracked item remains to evict");
                break;
            };

            let victim = self.trash_path.join(&name);
            match self.fs.remove_file(&victim) {
                Ok(()) => {
                    last_evicted = Some(index);
                    if self.verbose {
                        info!(item = %name, "evicted oldest trash item");
                    } else {
                        debug!(item = %name, "evicted oldest trash item");
                    }
                }
                Err(err) => {
                    warn!(item = %name, error = %err, "failed to evict trash item, skipping");
                }
            }
            cursor = index + 1;
        }

        if let Some(last) = last_evicted {
            // Skipped-over missing entries are no longer meaningfully the
            // oldest live items, so they go too. Entries whose deletion
            // failed still have a file on disk and stay queued.
            let items = std::mem::take(&mut self.held_items);
            self.held_items = items
                .into_iter()
                .enumerate()
                .filter(|(index, name)| {
                    *index > last || self.fs.exists(&self.trash_path.join(name.as_str()))
                })
                .map(|(_, name)| name)
                .collect();
        }
        Ok(())
    }

    /// Total size of regular files directly in the trash directory, ignoring
    /// the config and lock files. Always a full recomputation.
    pub fn space_used(&self) -> crate::Result<u64> {
        if !self.fs.exists(&self.trash_path) {
            return Ok(0);
        }
        let mut total = 0u64;
        for entry in self.fs.list_dir(&self.trash_path)? {
            match entry.file_name().and_then(|n| n.to_str()) {
                Some(name) if !is_internal_name(name) => {}
                _ => continue,
            }
            // Entries can vanish mid-scan; a stat failure just means zero
            // contribution.
            let Ok(metadata) = self.fs.metadata(&entry) else {
                continue;
            };
            if metadata.is_file() {
                total += metadata.len();
            }
        }
        Ok(total)
    }

    /// Base names of everything in the trash directory except the config and
    /// lock files, in filesystem enumeration order.
    pub fn contents(&self) -> crate::Result<Vec<String>> {
        if !self.fs.exists(&self.trash_path) {
            return Ok(Vec::new());
        }
        Ok(self
            .fs
            .list_dir(&self.trash_path)?
            .into_iter()
            .filter_map(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
            })
            .filter(|name| !is_internal_name(name))
            .collect())
    }

    /// Deletes everything in the trash directory and empties the item queue.
    /// Capacity is unchanged.
    pub fn clear_all(&mut self) -> crate::Result<()> {
        for name in self.contents()? {
            let path = self.trash_path.join(&name);
            let removed = match self.fs.metadata(&path) {
                Ok(metadata) if metadata.is_dir() => self.fs.remove_dir_all(&path),
                _ => self.fs.remove_file(&path),
            };
            if let Err(err) = removed {
                warn!(item = %name, error = %err, "failed to clear trash item");
            } else if self.verbose {
                info!(item = %name, "cleared trash item");
            }
        }
        self.held_items.clear();
        Ok(())
    }

    /// Persists capacity and the held-item queue as a whole-file overwrite
    /// of the config file. Call exactly once, after all mutations.
    pub fn save(&self) -> crate::Result<()> {
        self.fs.create_dir_all(&self.trash_path)?;
        let config = TrashConfig {
            capacity_bytes: self.capacity_bytes,
            held_items: self.held_items.clone(),
        };
        config.save(&self.fs, &self.config_path)
    }
}

fn is_internal_name(name: &str) -> bool {
    name == CONFIG_FILE_NAME || name == LOCK_FILE_NAME
}
