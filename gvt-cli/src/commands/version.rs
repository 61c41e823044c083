use super::Report;
use gvt_core::{parse_generation, Engine};

pub const READ_FAILED: i32 = 9972;

pub fn run(engine: &Engine, generation: Option<String>) -> Report {
    let result = generation
        .as_deref()
        .map(parse_generation)
        .transpose()
        .and_then(|generation| engine.version(generation));

    match result {
        Ok(info) => Report::success(info.to_string()),
        Err(err) => super::failure(
            err,
            READ_FAILED,
            "Version cannot be read. See ERR for details.",
        ),
    }
}
