//! Helper utilities for common task patterns.

use anyhow::Result;

use super::Context;

/// Run a step whose failure must never stop the bootstrap.
///
/// Returns the step's value on success. On failure, logs a warning naming
/// `what` and returns `None`.
pub fn best_effort<T>(ctx: &Context, what: &str, step: impl FnOnce() -> Result<T>) -> Option<T> {
    match step() {
        Ok(value) => Some(value),
        Err(e) => {
            ctx.log.warn(&format!("{what} failed: {e:#}"));
            None
        }
    }
}
