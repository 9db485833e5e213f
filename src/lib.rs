//! Capacity-bounded trash store: `saferm` moves files into a managed
//! `~/.safetrash` directory instead of deleting them, evicting the oldest
//! items once the configured capacity is exceeded.

pub mod config;
pub mod errors;
pub mod fs;
pub mod helpers;
pub mod lock;
pub mod trash;

pub use config::{
    clamp_capacity_mb, TrashConfig, CONFIG_FILE_NAME, DEFAULT_CAPACITY_MB, LOCK_FILE_NAME,
    MAX_CAPACITY_MB, MIN_CAPACITY_MB, TRASH_DIRECTORY_NAME,
};
pub use errors::{Result, TrashError};
pub use fs::{home_directory, FileSystem, RealFileSystem};
pub use helpers::{bytes_to_mb, mb_to_bytes, print_size, sanitize_user_path, BYTES_PER_MB};
pub use lock::ConfigLock;
pub use trash::{Trash, TrashedItem};

/// Re-export a small stable API surface for front-end crates.
pub mod prelude {
    pub use crate::{
        config::*,
        errors::{Result, TrashError},
        fs::{home_directory, FileSystem, RealFileSystem},
        helpers::*,
        trash::{Trash, TrashedItem},
    };
}
