use super::Report;
use gvt_core::Engine;

pub const INIT_FAILED: i32 = -3;

pub fn run(engine: &Engine) -> Report {
    match engine.init() {
        Ok(_) => Report::success("Current directory initialized successfully."),
        Err(err) => super::failure(
            err,
            INIT_FAILED,
            "Underlying system problem. See ERR for details.",
        ),
    }
}
