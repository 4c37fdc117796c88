//! Runner abstraction for engine invocation.
//!
//! The [`EngineRunner`] trait decouples the loader from process spawning.
//! Tests use scripted runners that return predetermined outcomes and record
//! what they were asked to run.

use std::ffi::OsString;
use std::time::Duration;

use crate::core::types::ExecutionOutcome;
use crate::error::InvokeError;
use crate::io::process::run_invocation;

/// Abstraction over how an argument vector gets executed.
pub trait EngineRunner: Send + Sync {
    /// Run `argv` to completion or until `timeout` elapses.
    fn run(&self, argv: &[OsString], timeout: Duration) -> Result<ExecutionOutcome, InvokeError>;
}

/// Runner that spawns the engine as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubprocessRunner;

impl EngineRunner for SubprocessRunner {
    fn run(&self, argv: &[OsString], timeout: Duration) -> Result<ExecutionOutcome, InvokeError> {
        run_invocation(argv, timeout)
    }
}
