use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Number of a generation directory inside the repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u32);

impl Generation {
    pub const INITIAL: Generation = Generation(0);

    pub fn number(self) -> u32 {
        self.0
    }

    /// The following generation, or `None` once numbers are exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Generation)
    }

    /// Directory name of this generation under the repository root.
    pub fn dir_name(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Generation {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Generation)
    }
}

/// A generation that has been copied but not finalized yet.
///
/// Only [`SnapshotStore::finalize_generation`](crate::SnapshotStore::finalize_generation)
/// consumes it; dropping it leaves an orphan directory that no pointer references.
#[derive(Debug)]
#[must_use = "an unfinalized generation is never referenced by the latest pointer"]
pub struct PendingGeneration {
    generation: Generation,
    dir: PathBuf,
}

impl PendingGeneration {
    pub(crate) fn new(generation: Generation, dir: PathBuf) -> Self {
        Self { generation, dir }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// One line of `history` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub generation: Generation,
    pub summary: String,
}

impl HistoryEntry {
    /// Builds an entry from a full message, keeping its first line.
    pub fn from_message(generation: Generation, message: &str) -> Self {
        let summary = message.lines().next().unwrap_or_default().to_string();
        Self {
            generation,
            summary,
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.generation, self.summary)
    }
}
