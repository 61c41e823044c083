use super::Report;
use gvt_core::{Engine, Error, Mutation, MutationKind};
use std::path::PathBuf;

pub const MISSING_ARGUMENT: i32 = 20;
pub const FILE_NOT_FOUND: i32 = 21;
pub const ADD_FAILED: i32 = 22;

pub fn run(engine: &Engine, file: Option<PathBuf>, message: Option<String>) -> Report {
    let Some(file) = file else {
        return Report::failure(MISSING_ARGUMENT, "Please specify file to add.");
    };

    match engine.track(&file, message.as_deref()) {
        Ok(Mutation::Created(_)) => Report::success(MutationKind::Add.default_message(&file)),
        Ok(Mutation::Unchanged) => {
            Report::success(format!("File already added. File: {}", file.display()))
        }
        Err(Error::FileNotFound(_)) => Report::failure(
            FILE_NOT_FOUND,
            format!("File not found. File: {}", file.display()),
        ),
        Err(err @ Error::InvalidPath { .. }) => Report::failure(FILE_NOT_FOUND, err.to_string()),
        Err(err) => super::failure(
            err,
            ADD_FAILED,
            format!(
                "File cannot be added. See ERR for details. File: {}",
                file.display()
            ),
        ),
    }
}
