pub mod add;
pub mod checkout;
pub mod commit;
pub mod detach;
pub mod history;
pub mod init;
pub mod version;

use anyhow::{Context, Result};
use colored::Colorize;
use gvt_core::Error;
use std::path::PathBuf;
use tracing::error;

pub const SUCCESS: i32 = 0;
pub const NO_COMMAND: i32 = 1;
pub const NOT_INITIALIZED: i32 = -2;
pub const ALREADY_INITIALIZED: i32 = 10;
pub const INVALID_GENERATION: i32 = 60;

pub fn get_work_dir(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Cannot determine current directory")?;
    Ok(match custom_path {
        Some(path) => current.join(path),
        None => current,
    })
}

/// What a verb tells the shell: exit status plus one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub code: i32,
    pub message: String,
}

impl Report {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            code: SUCCESS,
            message: message.into(),
        }
    }

    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn no_command() -> Self {
        Self::failure(NO_COMMAND, "Please specify command.")
    }

    pub fn unknown_command(name: &str) -> Self {
        Self::failure(NO_COMMAND, format!("Unknown command {}.", name))
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS
    }

    pub fn print(&self) {
        if self.is_success() {
            println!("{}", self.message);
        } else {
            eprintln!("{}", self.message.red());
        }
    }
}

/// Maps errors every verb shares. Storage failures are reported under `code`
/// with `message`, details going to the log; anything else keeps its own text.
pub fn failure(err: Error, code: i32, message: impl Into<String>) -> Report {
    match err {
        Error::NotInitialized => Report::failure(NOT_INITIALIZED, err.to_string()),
        Error::AlreadyInitialized => Report::failure(ALREADY_INITIALIZED, err.to_string()),
        Error::InvalidGeneration(_) => Report::failure(INVALID_GENERATION, err.to_string()),
        err if err.is_storage_failure() => {
            error!("{}", err);
            Report::failure(code, message)
        }
        err => Report::failure(code, err.to_string()),
    }
}
