//! # gvt-core
//!
//! Core library for gvt - numbered, immutable snapshots of a working directory.
//!
//! Every tracked-file mutation copies the latest generation in full into a new
//! generation directory, applies the change, and only then advances the
//! repository pointers. The [`Engine`] exposes the user-facing verbs on top of
//! the [`SnapshotStore`] primitives.

pub mod copy;
pub mod engine;
pub mod error;
pub mod lock;
pub mod models;
pub mod store;

pub use copy::copy_tree;
pub use engine::{parse_generation, Engine, Mutation, MutationKind, VersionInfo};
pub use error::{Error, Result};
pub use models::{Generation, HistoryEntry, PendingGeneration};
pub use store::{SnapshotStore, INIT_MESSAGE, REPO_DIR};
