use super::Report;
use gvt_core::{Engine, Error, Mutation, MutationKind};
use std::path::PathBuf;

pub const MISSING_ARGUMENT: i32 = 30;
pub const DETACH_FAILED: i32 = 31;

pub fn run(engine: &Engine, file: Option<PathBuf>, message: Option<String>) -> Report {
    let Some(file) = file else {
        return Report::failure(MISSING_ARGUMENT, "Please specify file to detach.");
    };

    match engine.untrack(&file, message.as_deref()) {
        Ok(Mutation::Created(_)) => Report::success(MutationKind::Detach.default_message(&file)),
        Ok(Mutation::Unchanged) => Report::success(format!(
            "File is not added to gvt. File: {}",
            file.display()
        )),
        Err(err @ Error::InvalidPath { .. }) => Report::failure(DETACH_FAILED, err.to_string()),
        Err(err) => super::failure(
            err,
            DETACH_FAILED,
            format!(
                "File cannot be detached. See ERR for details. File: {}",
                file.display()
            ),
        ),
    }
}
