//! Error taxonomy for engine invocations.
//!
//! Every fallible operation in the library returns [`InvokeError`]. Variants
//! keep the raw diagnostic detail (stderr, stdout, offending literal, OS error)
//! so a failure can be debugged from the error alone.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why the engine exited with a nonzero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    /// The module trapped (division by zero, out-of-bounds access, ...).
    Trap,
    /// The engine rejected its command-line arguments.
    InvalidArguments,
    /// The named export does not exist in the module.
    FunctionNotFound,
    /// Any other nonzero exit status.
    Unknown(i32),
}

impl ExecutionErrorKind {
    /// Stable snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionErrorKind::Trap => "trap",
            ExecutionErrorKind::InvalidArguments => "invalid_arguments",
            ExecutionErrorKind::FunctionNotFound => "function_not_found",
            ExecutionErrorKind::Unknown(_) => "unknown_execution_error",
        }
    }
}

impl std::fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionErrorKind::Trap => f.write_str("trap"),
            ExecutionErrorKind::InvalidArguments => f.write_str("engine rejected arguments"),
            ExecutionErrorKind::FunctionNotFound => f.write_str("function not found"),
            ExecutionErrorKind::Unknown(code) => write!(f, "unknown failure (exit status {code})"),
        }
    }
}

/// A classified nonzero engine exit, carrying the captured stderr verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("engine execution failed: {kind}: {stderr}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("no WebAssembly engine found (tried: {})", .tried.join(", "))]
    RuntimeNotFound { tried: Vec<String> },

    #[error("module not found: {}", .path.display())]
    ModuleNotFound { path: PathBuf },

    #[error("module not readable: {}: {source}", .path.display())]
    ModuleNotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("function name must not be empty")]
    EmptyFunctionName,

    #[error("invalid integer argument: {literal:?}")]
    InvalidArgument { literal: String },

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("engine timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("engine produced no result (stdout: {stdout:?})")]
    NoResult { stdout: String },

    #[error("malformed result {candidate:?} (stdout: {stdout:?})")]
    MalformedResult { candidate: String, stdout: String },

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invocation worker panicked")]
    Worker,
}

impl InvokeError {
    /// Stable snake_case tag for logs and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            InvokeError::RuntimeNotFound { .. } => "runtime_not_found",
            InvokeError::ModuleNotFound { .. } => "module_not_found",
            InvokeError::ModuleNotReadable { .. } => "module_not_readable",
            InvokeError::EmptyFunctionName => "empty_function_name",
            InvokeError::InvalidArgument { .. } => "invalid_argument",
            InvokeError::Launch { .. } => "launch",
            InvokeError::Timeout { .. } => "timeout",
            InvokeError::Execution(err) => err.kind.as_str(),
            InvokeError::NoResult { .. } => "no_result",
            InvokeError::MalformedResult { .. } => "malformed_result",
            InvokeError::Io { .. } => "io",
            InvokeError::Worker => "worker",
        }
    }

    /// True for failures detected while validating the request, before any
    /// process was spawned.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            InvokeError::ModuleNotFound { .. }
                | InvokeError::ModuleNotReadable { .. }
                | InvokeError::EmptyFunctionName
                | InvokeError::InvalidArgument { .. }
        )
    }

    pub(crate) fn io(context: &'static str, source: io::Error) -> Self {
        InvokeError::Io { context, source }
    }
}
