use std::path::PathBuf;
use thiserror::Error;

use crate::models::Generation;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Current directory is not initialized. Please use init command to initialize.")]
    NotInitialized,

    #[error("Current directory is already initialized.")]
    AlreadyInitialized,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid version number: {0}")]
    InvalidGeneration(String),

    #[error("Corrupt {pointer} pointer: {value:?}")]
    CorruptPointer { pointer: &'static str, value: String },

    #[error("Generation {0} has no message record")]
    MissingGeneration(Generation),

    #[error("Invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the underlying storage medium or repository
    /// bookkeeping, as opposed to bad user input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::CorruptPointer { .. } | Error::MissingGeneration(_)
        )
    }
}
