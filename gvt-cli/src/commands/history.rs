use super::Report;
use gvt_core::Engine;

pub const READ_FAILED: i32 = 9952;

/// Number of entries `--last` asks for. Zero or an unparsable count means
/// all of them; a negative count means none.
fn entry_limit(last: Option<&str>) -> Option<usize> {
    match last.map(|raw| raw.trim().parse::<i64>()) {
        Some(Ok(count)) if count < 0 => Some(0),
        Some(Ok(count)) if count > 0 => Some(usize::try_from(count).unwrap_or(usize::MAX)),
        _ => None,
    }
}

pub fn run(engine: &Engine, last: Option<String>) -> Report {
    match engine.history(entry_limit(last.as_deref())) {
        Ok(entries) => Report::success(
            entries
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Err(err) => super::failure(
            err,
            READ_FAILED,
            "History cannot be read. See ERR for details.",
        ),
    }
}
