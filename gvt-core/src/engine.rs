use crate::error::{Error, Result};
use crate::lock::{self, LockMode};
use crate::models::{Generation, HistoryEntry};
use crate::store::{is_internal, SnapshotStore};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Kind of tracked-file mutation, used for default messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Detach,
    Commit,
}

impl MutationKind {
    pub fn as_str(&self) -> &str {
        match self {
            MutationKind::Add => "added",
            MutationKind::Detach => "detached",
            MutationKind::Commit => "committed",
        }
    }

    /// Message recorded when the user does not supply one.
    pub fn default_message(&self, file: &Path) -> String {
        format!("File {} successfully. File: {}", self.as_str(), file.display())
    }
}

/// Result of a mutating verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A new generation was finalized.
    Created(Generation),
    /// The request was already satisfied; no generation was created.
    Unchanged,
}

/// A generation number together with its full message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub generation: Generation,
    pub message: String,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version: {}\n{}", self.generation, self.message)
    }
}

/// Parses a user-supplied generation number.
pub fn parse_generation(raw: &str) -> Result<Generation> {
    raw.parse()
        .map_err(|_| Error::InvalidGeneration(raw.to_string()))
}

/// User-facing verbs over a working directory and its repository.
pub struct Engine {
    work_dir: PathBuf,
}

impl Engine {
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn store(&self) -> Result<SnapshotStore> {
        SnapshotStore::locate(&self.work_dir)
    }

    pub fn init(&self) -> Result<SnapshotStore> {
        SnapshotStore::create(&self.work_dir)
    }

    /// Starts tracking `file`, snapshotting its current content.
    pub fn track(&self, file: &Path, message: Option<&str>) -> Result<Mutation> {
        let store = self.store()?;
        let (source, relative) = self.resolve(file)?;
        require_file(&source)?;

        let _guard = lock::acquire(store.root(), LockMode::Exclusive)?;
        let latest = store.latest_generation()?;
        if store.contains(latest, &relative) {
            debug!("{:?} already tracked in generation {}", relative, latest);
            return Ok(Mutation::Unchanged);
        }

        let pending = store.begin_generation(latest)?;
        let target = pending.dir().join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &target)?;

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| MutationKind::Add.default_message(file));
        let generation = store.finalize_generation(pending, &message)?;
        info!("Tracked {:?} in generation {}", relative, generation);
        Ok(Mutation::Created(generation))
    }

    /// Stops tracking `file`. The working copy is not touched.
    pub fn untrack(&self, file: &Path, message: Option<&str>) -> Result<Mutation> {
        let store = self.store()?;
        let (_, relative) = self.resolve(file)?;

        let _guard = lock::acquire(store.root(), LockMode::Exclusive)?;
        let latest = store.latest_generation()?;
        if !store.contains(latest, &relative) {
            debug!("{:?} not tracked in generation {}", relative, latest);
            return Ok(Mutation::Unchanged);
        }

        let pending = store.begin_generation(latest)?;
        let target = pending.dir().join(&relative);
        if target.is_dir() {
            fs::remove_dir_all(&target)?;
        } else {
            fs::remove_file(&target)?;
        }

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| MutationKind::Detach.default_message(file));
        let generation = store.finalize_generation(pending, &message)?;
        info!("Detached {:?} in generation {}", relative, generation);
        Ok(Mutation::Created(generation))
    }

    /// Records the current content of an already tracked `file`.
    pub fn update(&self, file: &Path, message: Option<&str>) -> Result<Mutation> {
        let store = self.store()?;
        let (source, relative) = self.resolve(file)?;
        require_file(&source)?;

        let _guard = lock::acquire(store.root(), LockMode::Exclusive)?;
        let latest = store.latest_generation()?;
        if !store.contains(latest, &relative) {
            debug!("{:?} not tracked in generation {}", relative, latest);
            return Ok(Mutation::Unchanged);
        }

        let pending = store.begin_generation(latest)?;
        fs::copy(&source, pending.dir().join(&relative))?;

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| MutationKind::Commit.default_message(file));
        let generation = store.finalize_generation(pending, &message)?;
        info!("Committed {:?} in generation {}", relative, generation);
        Ok(Mutation::Created(generation))
    }

    /// Copies `generation` over the working directory and makes it active.
    pub fn checkout(&self, generation: Generation) -> Result<Generation> {
        let store = self.store()?;

        let _guard = lock::acquire(store.root(), LockMode::Exclusive)?;
        self.ensure_in_range(&store, generation)?;
        store.restore(generation, &self.work_dir)?;
        store.set_active_generation(generation)?;

        info!("Checked out generation {}", generation);
        Ok(generation)
    }

    /// Message of `generation`, or of the active generation when `None`.
    pub fn version(&self, generation: Option<Generation>) -> Result<VersionInfo> {
        let store = self.store()?;

        let _guard = lock::acquire(store.root(), LockMode::Shared)?;
        let generation = match generation {
            Some(generation) => generation,
            None => store.active_generation()?,
        };
        self.ensure_in_range(&store, generation)?;

        Ok(VersionInfo {
            generation,
            message: store.read_message(generation)?,
        })
    }

    /// Summaries from latest downwards, at most `limit` of them when given.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        let store = self.store()?;

        let _guard = lock::acquire(store.root(), LockMode::Shared)?;
        let latest = store.latest_generation()?;
        let limit = limit.unwrap_or(usize::MAX);

        (0..=latest.number())
            .rev()
            .take(limit)
            .map(|number| -> Result<HistoryEntry> {
                let generation = Generation(number);
                let message = store.read_message(generation)?;
                Ok(HistoryEntry::from_message(generation, &message))
            })
            .collect()
    }

    fn ensure_in_range(&self, store: &SnapshotStore, generation: Generation) -> Result<()> {
        let latest = store.latest_generation()?;
        if generation > latest {
            return Err(Error::InvalidGeneration(generation.to_string()));
        }
        Ok(())
    }

    /// Splits `file` into its on-disk location and its path relative to the
    /// working directory.
    fn resolve(&self, file: &Path) -> Result<(PathBuf, PathBuf)> {
        let invalid = |reason: &'static str| Error::InvalidPath {
            path: file.to_path_buf(),
            reason,
        };

        let relative = if file.is_absolute() {
            let normalized = normalize(file).ok_or_else(|| invalid("escapes the filesystem root"))?;
            let work_dir =
                normalize(&self.work_dir).ok_or_else(|| invalid("working directory is invalid"))?;
            normalized
                .strip_prefix(&work_dir)
                .map(Path::to_path_buf)
                .map_err(|_| invalid("outside the working directory"))?
        } else {
            normalize(file).ok_or_else(|| invalid("outside the working directory"))?
        };

        if relative.as_os_str().is_empty() {
            return Err(invalid("names the working directory itself"));
        }
        if relative.iter().any(is_internal) {
            return Err(invalid("inside the repository"));
        }

        Ok((self.work_dir.join(&relative), relative))
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::FileNotFound(path.to_path_buf()))
    }
}

/// Lexically folds `.` and `..`; `None` when `..` climbs above the start.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                out.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
            Component::RootDir | Component::Prefix(_) => out.push(component.as_os_str()),
        }
    }
    Some(out)
}
