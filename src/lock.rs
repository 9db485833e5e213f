//! Advisory locking for the trash directory.
//!
//! Each invocation follows a load-mutate-save sequence against shared
//! filesystem state; without a lock, two concurrent invocations can
//! interleave and silently lose one side's update. The lock is scoped to the
//! guard value, so every exit path (including error returns) releases it.

use crate::errors::TrashError;
use fs2::FileExt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Exclusive advisory lock on a trash directory, held for the lifetime of
/// the guard.
#[derive(Debug)]
pub struct ConfigLock {
    file: File,
}

impl ConfigLock {
    /// Blocks until the exclusive lock on `lock_path` is acquired.
    pub fn acquire(lock_path: &Path) -> crate::Result<Self> {
        let file =
            File::create(lock_path).map_err(|err| TrashError::Lock(lock_path.to_path_buf(), err))?;
        file.lock_exclusive()
            .map_err(|err| TrashError::Lock(lock_path.to_path_buf(), err))?;
        debug!(path = %lock_path.display(), "acquired trash lock");
        Ok(Self { file })
    }
}

impl Drop for ConfigLock {
    fn drop(&mut self) {
        // Release errors are not actionable; the OS drops the lock on close
        // anyway.
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_can_be_reacquired_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join(".trashlock");

        let first = ConfigLock::acquire(&lock_path).unwrap();
        drop(first);
        let _second = ConfigLock::acquire(&lock_path).unwrap();
    }
}
