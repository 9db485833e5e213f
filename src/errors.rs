use std::{io, path::PathBuf};

/// Error type shared by the trash store and its CLI front end.
#[derive(thiserror::Error, Debug)]
pub enum TrashError {
    /// File system I/O failure (rename, remove, write, directory read).
    #[error("I/O error while accessing {0}")]
    Io(PathBuf, #[source] io::Error),

    /// The path could not be resolved or does not exist.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Single-file move-in was invoked on a directory.
    #[error("{0} is a directory (use the recursive variant)")]
    IsDirectory(PathBuf),

    /// The item alone is larger than the configured trash capacity.
    #[error("{path} is {size} bytes, larger than the trash capacity of {capacity} bytes")]
    ExceedsCapacity {
        path: PathBuf,
        size: u64,
        capacity: u64,
    },

    /// The advisory lock on the trash directory could not be taken.
    #[error("failed to lock trash directory {0}")]
    Lock(PathBuf, #[source] io::Error),
}

impl TrashError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }
}

/// Shared result alias for the crate.
pub type Result<T> = std::result::Result<T, TrashError>;
