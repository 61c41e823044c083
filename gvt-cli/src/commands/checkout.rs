use super::Report;
use gvt_core::{parse_generation, Engine};

pub const MISSING_ARGUMENT: i32 = 40;
pub const CHECKOUT_FAILED: i32 = 9923;

pub fn run(engine: &Engine, generation: Option<String>) -> Report {
    let Some(raw) = generation else {
        return Report::failure(MISSING_ARGUMENT, "Please specify version to checkout.");
    };

    let result = parse_generation(&raw).and_then(|generation| engine.checkout(generation));
    match result {
        Ok(generation) => {
            Report::success(format!("Checkout successful for version: {}", generation))
        }
        Err(err) => super::failure(
            err,
            CHECKOUT_FAILED,
            "Checkout cannot be completed. See ERR for details.",
        ),
    }
}
