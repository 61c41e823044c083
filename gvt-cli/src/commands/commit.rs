use super::Report;
use gvt_core::{Engine, Error, Mutation, MutationKind};
use std::path::PathBuf;

pub const MISSING_ARGUMENT: i32 = 50;
pub const FILE_NOT_FOUND: i32 = 51;
pub const COMMIT_FAILED: i32 = 52;

pub fn run(engine: &Engine, file: Option<PathBuf>, message: Option<String>) -> Report {
    let Some(file) = file else {
        return Report::failure(MISSING_ARGUMENT, "Please specify file to commit.");
    };

    match engine.update(&file, message.as_deref()) {
        Ok(Mutation::Created(_)) => Report::success(MutationKind::Commit.default_message(&file)),
        Ok(Mutation::Unchanged) => Report::success(format!(
            "File is not added to gvt. File: {}",
            file.display()
        )),
        Err(Error::FileNotFound(_)) => Report::failure(
            FILE_NOT_FOUND,
            format!("File not found. File: {}", file.display()),
        ),
        Err(err @ Error::InvalidPath { .. }) => Report::failure(FILE_NOT_FOUND, err.to_string()),
        Err(err) => super::failure(
            err,
            COMMIT_FAILED,
            format!(
                "File cannot be committed. See ERR for details. File: {}",
                file.display()
            ),
        ),
    }
}
