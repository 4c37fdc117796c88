//! Deterministic classification of engine exit statuses.

use crate::error::{ExecutionError, ExecutionErrorKind};
use crate::exit_codes::engine;

/// Map an engine exit status to an execution error.
///
/// - `0` is success and yields `None`.
/// - `1` trap, `2` invalid arguments, `3` function not found.
/// - Any other status is `Unknown` and keeps the raw code.
///
/// The captured stderr is attached verbatim.
pub fn classify(exit_code: i32, stderr: &str) -> Option<ExecutionError> {
    let kind = match exit_code {
        engine::SUCCESS => return None,
        engine::TRAP => ExecutionErrorKind::Trap,
        engine::INVALID_ARGUMENTS => ExecutionErrorKind::InvalidArguments,
        engine::FUNCTION_NOT_FOUND => ExecutionErrorKind::FunctionNotFound,
        other => ExecutionErrorKind::Unknown(other),
    };
    Some(ExecutionError {
        kind,
        stderr: stderr.to_string(),
    })
}
