//! Execute exported WebAssembly functions through an installed engine.
//!
//! The crate never interprets WebAssembly itself. It finds an engine such as
//! `wasmtime` on the host, runs `<engine> run --invoke <function> <module>
//! <args...>` as a child process under a hard timeout, and returns the
//! function's integer result as text. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (literal grammar, argv building,
//!   exit-status classification, result parsing). No I/O.
//! - **[`io`]**: Side-effecting operations (engine discovery, process
//!   execution, configuration files).
//!
//! [`loader`] coordinates the two and exposes the host-facing
//! [`WasmLoader::execute_wasm_function`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use wasm_invoker::{InvokerConfig, WasmLoader};
//!
//! let loader = Arc::new(WasmLoader::from_config(&InvokerConfig::default()));
//! let pending = loader.execute_wasm_function("add.wasm", "add", vec!["40".into(), "2".into()]);
//! match pending.wait() {
//!     Ok(result) => println!("{result}"),
//!     Err(err) => eprintln!("{}: {err}", err.kind()),
//! }
//! ```

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod loader;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::types::{ExecutionOutcome, InvocationRequest, ParsedResult, RuntimeDescriptor};
pub use error::{ExecutionError, ExecutionErrorKind, InvokeError};
pub use io::config::InvokerConfig;
pub use loader::{PendingInvocation, WasmLoader};
