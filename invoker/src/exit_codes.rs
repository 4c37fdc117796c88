//! Stable exit codes for the `wasm-invoker` CLI, and the engine's own
//! exit-status contract.

/// Invocation succeeded and the result was printed.
pub const OK: i32 = 0;
/// The engine ran but the invocation failed (trap, timeout, bad output, ...).
pub const FAILED: i32 = 1;
/// The request was rejected before any process was spawned.
pub const INVALID_REQUEST: i32 = 2;
/// No WebAssembly engine could be located.
pub const NO_ENGINE: i32 = 3;

/// Exit statuses reported by the engine process.
pub mod engine {
    /// The function ran and printed its result.
    pub const SUCCESS: i32 = 0;
    /// The module trapped.
    pub const TRAP: i32 = 1;
    /// The engine rejected its command-line arguments.
    pub const INVALID_ARGUMENTS: i32 = 2;
    /// The named export does not exist.
    pub const FUNCTION_NOT_FOUND: i32 = 3;
}
