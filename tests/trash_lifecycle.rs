//! End-to-end lifecycle tests: each `Trash` value plays the role of one CLI
//! invocation, with all coordination passing through the trash directory.

use saferm::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HALF_MB: usize = 512 * 1024;

fn open(dir: &TempDir) -> Trash {
    Trash::open_in(dir.path(), RealFileSystem).unwrap()
}

fn write_file(dir: &Path, name: &str, bytes: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; bytes]).unwrap();
    path
}

#[test]
fn state_survives_across_invocations() {
    let dir = tempfile::tempdir().unwrap();

    // First invocation: shrink the trash and move a file in.
    {
        let mut trash = open(&dir);
        trash.set_capacity_mb(2);
        let source = write_file(dir.path(), "first", HALF_MB);
        trash.move_in(&source).unwrap();
        trash.save().unwrap();
    }

    // Second invocation sees the persisted capacity and queue, and its own
    // move-in evicts the item held since the first one.
    {
        let mut trash = open(&dir);
        assert_eq!(trash.capacity_bytes(), mb_to_bytes(2));
        assert_eq!(trash.held_items(), ["first"]);

        // Four more half-MB files push the total to 2.5 MB, strictly over
        // the 2 MB bound; eviction fires only above capacity.
        for name in ["second", "third", "fourth", "fifth"] {
            let source = write_file(dir.path(), name, HALF_MB);
            trash.move_in(&source).unwrap();
        }
        assert!(trash.space_used().unwrap() <= trash.capacity_bytes());
        assert!(!trash.trash_path().join("first").exists());
        trash.save().unwrap();
    }

    // Third invocation: clearing leaves capacity intact.
    {
        let mut trash = open(&dir);
        trash.clear_all().unwrap();
        trash.save().unwrap();
        assert_eq!(trash.space_used().unwrap(), 0);
        assert_eq!(trash.capacity_bytes(), mb_to_bytes(2));
        assert!(trash.held_items().is_empty());
    }
}

#[test]
fn corrupt_config_never_prevents_operation() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut trash = open(&dir);
        let source = write_file(dir.path(), "keepsake", 32);
        trash.move_in(&source).unwrap();
        trash.save().unwrap();
    }

    let config_path = dir.path().join(TRASH_DIRECTORY_NAME).join(CONFIG_FILE_NAME);
    fs::write(&config_path, "garbage header\nkeepsake\n").unwrap();

    let trash = open(&dir);
    assert_eq!(trash.capacity_bytes(), mb_to_bytes(DEFAULT_CAPACITY_MB));
    // The queue hint resets, but the moved file itself is untouched.
    assert!(trash.held_items().is_empty());
    assert_eq!(trash.contents().unwrap(), ["keepsake"]);
}

#[test]
fn capacity_round_trips_clamped() {
    let dir = tempfile::tempdir().unwrap();
    for (requested, stored_mb) in [(0, MIN_CAPACITY_MB), (50, 50), (1 << 40, MAX_CAPACITY_MB)] {
        {
            let mut trash = open(&dir);
            trash.set_capacity_mb(requested);
            trash.save().unwrap();
        }
        let trash = open(&dir);
        assert_eq!(trash.capacity_bytes(), mb_to_bytes(stored_mb));
    }
}
