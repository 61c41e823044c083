use crate::copy::copy_tree;
use crate::error::{Error, Result};
use crate::models::{Generation, PendingGeneration};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the repository root inside the working directory.
pub const REPO_DIR: &str = ".gvt";
/// Every bookkeeping file inside the repository starts with this prefix.
pub const INTERNAL_PREFIX: &str = ".gvt.";

const LATEST_FILE: &str = ".gvt.latest";
const ACTIVE_FILE: &str = ".gvt.active";
const MESSAGE_FILE: &str = ".gvt.message";

pub const INIT_MESSAGE: &str = "GVT initialized.";

/// Matches repository-internal entries: the root itself and prefixed files.
pub fn is_internal(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name == REPO_DIR || name.starts_with(INTERNAL_PREFIX)
}

/// On-disk repository of numbered generations.
///
/// ```text
/// .gvt/
///   .gvt.latest        # highest finalized generation
///   .gvt.active        # generation the working tree reflects
///   <N>/
///     .gvt.message     # commit message, first line is the summary
///     <tracked files>
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Creates a fresh repository under `work_dir` with generation 0 finalized.
    pub fn create<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let root = work_dir.as_ref().join(REPO_DIR);
        if root.exists() {
            return Err(Error::AlreadyInitialized);
        }

        fs::create_dir_all(&root)?;
        let store = Self { root };
        store.write_pointer(LATEST_FILE, Generation::INITIAL)?;
        store.write_pointer(ACTIVE_FILE, Generation::INITIAL)?;

        let initial = store.generation_dir(Generation::INITIAL);
        fs::create_dir_all(&initial)?;
        fs::write(initial.join(MESSAGE_FILE), INIT_MESSAGE)?;

        info!("Initialized repository at {:?}", store.root);
        Ok(store)
    }

    /// Opens the repository under `work_dir`.
    pub fn locate<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let root = work_dir.as_ref().join(REPO_DIR);
        if !root.is_dir() {
            return Err(Error::NotInitialized);
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generation_dir(&self, generation: Generation) -> PathBuf {
        self.root.join(generation.dir_name())
    }

    pub fn latest_generation(&self) -> Result<Generation> {
        self.read_pointer(LATEST_FILE, "latest")
    }

    pub fn active_generation(&self) -> Result<Generation> {
        self.read_pointer(ACTIVE_FILE, "active")
    }

    /// Overwrites the active pointer. Range checks belong to the caller.
    pub fn set_active_generation(&self, generation: Generation) -> Result<()> {
        self.write_pointer(ACTIVE_FILE, generation)
    }

    /// Whether `relative` exists inside the snapshot of `generation`.
    pub fn contains(&self, generation: Generation, relative: &Path) -> bool {
        self.generation_dir(generation).join(relative).exists()
    }

    /// Allocates generation `from + 1` as a copy of `from`.
    ///
    /// The result is invisible to readers until it is passed to
    /// [`finalize_generation`](Self::finalize_generation).
    pub fn begin_generation(&self, from: Generation) -> Result<PendingGeneration> {
        let latest = self.latest_generation()?;
        let Some(generation) = from.next() else {
            return Err(Error::CorruptPointer {
                pointer: "latest",
                value: latest.to_string(),
            });
        };
        if generation <= latest {
            return Err(Error::InvalidGeneration(format!(
                "{generation} is already finalized"
            )));
        }

        let source = self.generation_dir(from);
        if !source.is_dir() {
            return Err(Error::MissingGeneration(from));
        }

        let dir = self.generation_dir(generation);
        if dir.exists() {
            warn!("Removing orphan generation directory {:?}", dir);
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir(&dir)?;

        let copied = copy_tree(&source, &dir, is_internal)?;
        debug!("Generation {} started from {} ({} files)", generation, from, copied);

        Ok(PendingGeneration::new(generation, dir))
    }

    /// Attaches `message` to a pending generation and advances both pointers.
    ///
    /// Pointers move only after the message is on disk, and latest moves
    /// before active.
    pub fn finalize_generation(
        &self,
        pending: PendingGeneration,
        message: &str,
    ) -> Result<Generation> {
        let generation = pending.generation();
        fs::write(pending.dir().join(MESSAGE_FILE), message)?;
        self.write_pointer(LATEST_FILE, generation)?;
        self.write_pointer(ACTIVE_FILE, generation)?;

        info!("Finalized generation {}", generation);
        Ok(generation)
    }

    /// Copies the snapshot of `generation` over `destination`.
    ///
    /// Files in `destination` that the snapshot lacks are left in place.
    pub fn restore<P: AsRef<Path>>(&self, generation: Generation, destination: P) -> Result<u64> {
        let source = self.generation_dir(generation);
        if !source.is_dir() {
            return Err(Error::MissingGeneration(generation));
        }

        let restored = copy_tree(&source, destination.as_ref(), is_internal)?;
        debug!(
            "Restored {} files from generation {} into {:?}",
            restored,
            generation,
            destination.as_ref()
        );
        Ok(restored)
    }

    pub fn read_message(&self, generation: Generation) -> Result<String> {
        let path = self.generation_dir(generation).join(MESSAGE_FILE);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::MissingGeneration(generation),
            _ => Error::Io(e),
        })
    }

    fn read_pointer(&self, file: &str, pointer: &'static str) -> Result<Generation> {
        let raw = match fs::read_to_string(self.root.join(file)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::CorruptPointer {
                    pointer,
                    value: String::new(),
                })
            }
            Err(e) => return Err(Error::Io(e)),
        };

        raw.parse::<Generation>().map_err(|_| Error::CorruptPointer {
            pointer,
            value: raw.clone(),
        })
    }

    fn write_pointer(&self, file: &str, generation: Generation) -> Result<()> {
        debug!("Writing {} = {}", file, generation);
        fs::write(self.root.join(file), generation.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_store() -> (TempDir, SnapshotStore) {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::create(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_writes_generation_zero() {
        let (_dir, store) = new_store();

        assert_eq!(store.latest_generation().unwrap(), Generation(0));
        assert_eq!(store.active_generation().unwrap(), Generation(0));
        assert_eq!(store.read_message(Generation(0)).unwrap(), INIT_MESSAGE);
    }

    #[test]
    fn test_create_twice_fails() {
        let (dir, _store) = new_store();

        assert!(matches!(
            SnapshotStore::create(dir.path()),
            Err(Error::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_locate_requires_repository() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            SnapshotStore::locate(dir.path()),
            Err(Error::NotInitialized)
        ));

        SnapshotStore::create(dir.path()).unwrap();
        let store = SnapshotStore::locate(dir.path()).unwrap();
        assert_eq!(store.root(), dir.path().join(REPO_DIR));
    }

    #[test]
    fn test_corrupt_pointer() {
        let (_dir, store) = new_store();
        fs::write(store.root().join(LATEST_FILE), "-4").unwrap();
        fs::remove_file(store.root().join(ACTIVE_FILE)).unwrap();

        assert!(matches!(
            store.latest_generation(),
            Err(Error::CorruptPointer { pointer: "latest", .. })
        ));
        assert!(matches!(
            store.active_generation(),
            Err(Error::CorruptPointer { pointer: "active", .. })
        ));
    }

    #[test]
    fn test_pointer_tolerates_trailing_newline() {
        let (_dir, store) = new_store();
        fs::write(store.root().join(LATEST_FILE), "0\n").unwrap();

        assert_eq!(store.latest_generation().unwrap(), Generation(0));
    }

    #[test]
    fn test_begin_generation_copies_content_without_message() {
        let (_dir, store) = new_store();
        fs::write(store.generation_dir(Generation(0)).join("a.txt"), "hello").unwrap();

        let pending = store.begin_generation(Generation(0)).unwrap();

        assert_eq!(pending.generation(), Generation(1));
        assert_eq!(
            fs::read_to_string(pending.dir().join("a.txt")).unwrap(),
            "hello"
        );
        assert!(!pending.dir().join(MESSAGE_FILE).exists());
        // Not yet visible.
        assert_eq!(store.latest_generation().unwrap(), Generation(0));
    }

    #[test]
    fn test_finalize_advances_pointers() {
        let (_dir, store) = new_store();
        let pending = store.begin_generation(Generation(0)).unwrap();

        let generation = store.finalize_generation(pending, "first\nbody").unwrap();

        assert_eq!(generation, Generation(1));
        assert_eq!(store.latest_generation().unwrap(), Generation(1));
        assert_eq!(store.active_generation().unwrap(), Generation(1));
        assert_eq!(store.read_message(Generation(1)).unwrap(), "first\nbody");
    }

    #[test]
    fn test_begin_generation_at_last_number() {
        let (_dir, store) = new_store();
        fs::write(store.root().join(LATEST_FILE), u32::MAX.to_string()).unwrap();

        assert!(matches!(
            store.begin_generation(Generation(u32::MAX)),
            Err(Error::CorruptPointer { pointer: "latest", .. })
        ));
    }

    #[test]
    fn test_failed_finalize_leaves_pointers() {
        let (_dir, store) = new_store();
        let pending = store.begin_generation(Generation(0)).unwrap();
        fs::create_dir(pending.dir().join(MESSAGE_FILE)).unwrap();

        assert!(store.finalize_generation(pending, "lost").is_err());
        assert_eq!(store.latest_generation().unwrap(), Generation(0));
        assert_eq!(store.active_generation().unwrap(), Generation(0));
    }

    #[test]
    fn test_begin_generation_refuses_finalized_target() {
        let (_dir, store) = new_store();
        let pending = store.begin_generation(Generation(0)).unwrap();
        store.finalize_generation(pending, "one").unwrap();

        assert!(matches!(
            store.begin_generation(Generation(0)),
            Err(Error::InvalidGeneration(_))
        ));
        assert_eq!(store.read_message(Generation(1)).unwrap(), "one");
    }

    #[test]
    fn test_begin_generation_reclaims_orphan() {
        let (_dir, store) = new_store();
        let orphan = store.begin_generation(Generation(0)).unwrap();
        fs::write(orphan.dir().join("stale.txt"), "stale").unwrap();
        drop(orphan);

        let pending = store.begin_generation(Generation(0)).unwrap();

        assert!(!pending.dir().join("stale.txt").exists());
    }

    #[test]
    fn test_restore_is_additive() {
        let (dir, store) = new_store();
        fs::write(store.generation_dir(Generation(0)).join("a.txt"), "v0").unwrap();
        let work = dir.path();
        fs::write(work.join("a.txt"), "edited").unwrap();
        fs::write(work.join("untracked.txt"), "mine").unwrap();

        let restored = store.restore(Generation(0), work).unwrap();

        assert_eq!(restored, 1);
        assert_eq!(fs::read_to_string(work.join("a.txt")).unwrap(), "v0");
        assert_eq!(fs::read_to_string(work.join("untracked.txt")).unwrap(), "mine");
        assert!(!work.join(MESSAGE_FILE).exists());
    }

    #[test]
    fn test_read_message_missing_generation() {
        let (_dir, store) = new_store();

        assert!(matches!(
            store.read_message(Generation(9)),
            Err(Error::MissingGeneration(Generation(9)))
        ));
        assert!(matches!(
            store.restore(Generation(9), store.root()),
            Err(Error::MissingGeneration(_))
        ));
    }

    #[test]
    fn test_is_internal() {
        assert!(is_internal(OsStr::new(".gvt")));
        assert!(is_internal(OsStr::new(".gvt.message")));
        assert!(is_internal(OsStr::new(".gvt.lock")));
        assert!(!is_internal(OsStr::new(".gvtignore")));
        assert!(!is_internal(OsStr::new("a.txt")));
    }
}
