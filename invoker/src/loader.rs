//! Orchestration for a single `execute_wasm_function` call.
//!
//! A [`WasmLoader`] owns the engine locator, the runner, and the memoized
//! [`RuntimeDescriptor`]. Each call validates the request, builds the argument
//! vector, runs the engine, and turns its exit status and stdout into either a
//! [`ParsedResult`] or an [`InvokeError`].

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::core::classifier::classify;
use crate::core::command::build_invocation;
use crate::core::result_parser::parse_result;
use crate::core::types::{InvocationRequest, ParsedResult, RuntimeDescriptor};
use crate::error::InvokeError;
use crate::io::config::InvokerConfig;
use crate::io::executor::{EngineRunner, SubprocessRunner};
use crate::io::locator::RuntimeLocator;

/// Executes exported functions through an external engine.
///
/// Share one loader across threads with `Arc`; the discovered engine is
/// cached for the loader's lifetime.
#[derive(Debug)]
pub struct WasmLoader<R = SubprocessRunner> {
    locator: RuntimeLocator,
    runner: R,
    timeout: Duration,
    runtime: OnceLock<RuntimeDescriptor>,
}

impl WasmLoader<SubprocessRunner> {
    pub fn new(locator: RuntimeLocator, timeout: Duration) -> Self {
        Self::with_runner(locator, SubprocessRunner, timeout)
    }

    pub fn from_config(config: &InvokerConfig) -> Self {
        Self::new(config.locator(), config.timeout())
    }
}

impl<R: EngineRunner> WasmLoader<R> {
    pub fn with_runner(locator: RuntimeLocator, runner: R, timeout: Duration) -> Self {
        Self {
            locator,
            runner,
            timeout,
            runtime: OnceLock::new(),
        }
    }

    /// The engine this loader invokes, discovered on first use.
    ///
    /// Concurrent first calls may each probe; whichever stores first wins and
    /// every caller gets that value. Failed discovery is not cached.
    pub fn runtime(&self) -> Result<RuntimeDescriptor, InvokeError> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime.clone());
        }
        let located = self.locator.locate()?;
        Ok(self.runtime.get_or_init(|| located).clone())
    }

    /// Run a validated request on the calling thread.
    #[instrument(skip_all, fields(function = request.function_name(), argc = request.args().len()))]
    pub fn invoke(&self, request: &InvocationRequest) -> Result<ParsedResult, InvokeError> {
        let runtime = self.runtime()?;
        let argv = build_invocation(&runtime, request)?;
        let outcome = self.runner.run(&argv, self.timeout)?;

        if let Some(err) = classify(outcome.exit_code, &outcome.stderr) {
            warn!(
                exit_code = outcome.exit_code,
                kind = err.kind.as_str(),
                "engine reported failure"
            );
            return Err(err.into());
        }

        let result = parse_result(&outcome.stdout).inspect_err(|err| {
            warn!(kind = err.kind(), "engine output has no valid result");
        })?;
        debug!(result = %result, "invocation succeeded");
        Ok(result)
    }

    /// Validate the inputs and run them on the calling thread.
    pub fn call<P, S, I, A>(
        &self,
        module_path: P,
        function_name: S,
        args: I,
    ) -> Result<ParsedResult, InvokeError>
    where
        P: Into<PathBuf>,
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let request = InvocationRequest::new(module_path, function_name, args)?;
        self.invoke(&request)
    }
}

impl<R: EngineRunner + 'static> WasmLoader<R> {
    /// Call `function_name` in the module at `module_path` on a worker thread.
    ///
    /// Returns immediately. The request is validated on the worker before any
    /// engine process is spawned.
    pub fn execute_wasm_function(
        self: &Arc<Self>,
        module_path: impl Into<PathBuf>,
        function_name: impl Into<String>,
        args: Vec<String>,
    ) -> PendingInvocation {
        let (tx, rx) = mpsc::sync_channel(1);
        let loader = Arc::clone(self);
        let module_path = module_path.into();
        let function_name = function_name.into();

        let worker_tx = tx.clone();
        let spawned = thread::Builder::new()
            .name("wasm-invoke".to_string())
            .spawn(move || {
                let result = loader.call(module_path, function_name, args);
                // The caller may have dropped the pending handle.
                let _ = worker_tx.send(result);
            });
        if let Err(e) = spawned {
            let _ = tx.send(Err(InvokeError::io("spawn invocation worker", e)));
        }
        PendingInvocation { rx }
    }
}

/// Handle to an invocation running on a worker thread.
#[derive(Debug)]
#[must_use = "the invocation result is only observable through this handle"]
pub struct PendingInvocation {
    rx: Receiver<Result<ParsedResult, InvokeError>>,
}

impl PendingInvocation {
    /// Block until the invocation finishes.
    pub fn wait(self) -> Result<ParsedResult, InvokeError> {
        self.rx.recv().unwrap_or(Err(InvokeError::Worker))
    }

    /// The result if the invocation has finished, without blocking.
    pub fn try_result(&self) -> Option<Result<ParsedResult, InvokeError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(InvokeError::Worker)),
        }
    }
}
