//! Advisory file locking with bounded retry
//!
//! Data files are guarded by an advisory exclusive lock so that a second
//! process (or a background save) cannot interleave with a read or write.
//! Acquisition is best-effort: after a bounded number of attempts the
//! operation proceeds without the lock, and the degraded status is carried on
//! the result so callers can report it instead of failing the save.

use std::fs::File;
use std::thread;
use std::time::Duration;

use fs2::FileExt;

/// Number of acquisition attempts before degrading
pub const LOCK_RETRIES: u32 = 5;

/// Fixed delay between attempts
pub const LOCK_DELAY: Duration = Duration::from_millis(100);

/// Whether an operation ran under the advisory lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// The exclusive lock was held for the duration of the operation
    Acquired,
    /// Every attempt failed; the operation proceeded unlocked
    Unlocked,
}

impl LockStatus {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired)
    }

    /// True when the operation ran without lock protection
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

/// A file handle with a scoped advisory lock
///
/// The lock (when held) is released on drop, so every exit path of the
/// surrounding operation releases it.
pub struct LockedFile {
    file: File,
    status: LockStatus,
}

impl LockedFile {
    /// Try to take an exclusive lock, retrying with a fixed delay
    pub fn exclusive(file: File) -> Self {
        for attempt in 1..=LOCK_RETRIES {
            if file.try_lock_exclusive().is_ok() {
                return Self {
                    file,
                    status: LockStatus::Acquired,
                };
            }
            if attempt < LOCK_RETRIES {
                thread::sleep(LOCK_DELAY);
            }
        }
        Self {
            file,
            status: LockStatus::Unlocked,
        }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if self.status.is_acquired() {
            let _ = self.file.unlock();
        }
    }
}
