//! Advisory locking of the repository root.
//!
//! Mutating verbs hold an exclusive lock for their whole transaction and
//! read-only verbs hold a shared one, so a reader never sees the latest
//! pointer while a writer is between the pointer writes.
//!
//! Lock file path: <root>/.gvt.lock
//! Lock is released on Drop.

use crate::error::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

pub const LOCK_FILE: &str = ".gvt.lock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

#[derive(Debug)]
pub struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    Ok(file)
}

/// Blocks until the lock on `root` is held in `mode`.
pub fn acquire(root: &Path, mode: LockMode) -> Result<LockGuard> {
    let path = root.join(LOCK_FILE);
    let file = open_lock_file(&path)?;
    match mode {
        LockMode::Shared => FileExt::lock_shared(&file)?,
        LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
    }
    debug!("Acquired {:?} lock on {:?}", mode, path);
    Ok(LockGuard { file })
}
