//! Test-only helpers: fake engines, placeholder modules, scripted runners.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::types::ExecutionOutcome;
use crate::error::InvokeError;
use crate::io::executor::EngineRunner;

/// Minimal module header; fake engines never look inside it.
const MODULE_BYTES: &[u8] = b"\0asm\x01\0\0\0";

/// Write a placeholder `.wasm` file and return its path.
pub fn write_module(dir: &Path, name: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, MODULE_BYTES)?;
    Ok(path)
}

/// Write `contents` to `dir/name` and mark it executable.
pub fn write_executable(dir: &Path, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(path)
}

/// Write a `/bin/sh` fake engine named `name` whose body is `body`.
///
/// The engine is called as `name run --invoke <function> <module> <args...>`,
/// so inside `body` the function is `$3`, the module `$4`, and the first
/// argument `$5`.
pub fn write_engine(dir: &Path, name: &str, body: &str) -> io::Result<PathBuf> {
    write_executable(dir, name, &format!("#!/bin/sh\n{body}\n"))
}

/// Engine bodies shared by unit and integration tests.
pub mod engines {
    /// Prints the sum of the first two arguments; fails like `wasmtime` on a
    /// missing export unless the function is `add`.
    pub const ADD: &str = r#"[ "$1" = run ] && [ "$2" = --invoke ] || { echo "bad cli" >&2; exit 2; }
[ "$3" = add ] || { echo "failed to find export \`$3\`" >&2; exit 3; }
echo $(($5 + $6))"#;

    /// Prints a diagnostic line before the result.
    pub const CHATTY: &str = r#"echo "warning: using fuel=none"
echo $(($5 * 2))"#;

    /// Exits with the status given as its first argument.
    pub const EXIT_WITH: &str = r#"echo "exiting with $5" >&2
exit $5"#;

    /// Prints a value then never finishes.
    pub const HANG: &str = "echo 1\nexec sleep 30";

    /// Prints a value and exits, leaving a background process on its pipes.
    pub const LINGER: &str = "sleep 5 &\necho 3";

    /// Floods both pipes well past their buffer size before printing `7`.
    pub const FLOOD: &str = r#"head -c 262144 /dev/zero | tr '\0' e >&2
head -c 262144 /dev/zero | tr '\0' o
echo " 7""#;
}

/// Runner that replays predetermined outcomes and records every argv.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outcomes: Mutex<VecDeque<Result<ExecutionOutcome, InvokeError>>>,
    calls: Mutex<Vec<Vec<OsString>>>,
}

impl ScriptedRunner {
    pub fn new(outcomes: Vec<Result<ExecutionOutcome, InvokeError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every argv passed to [`EngineRunner::run`], in call order.
    pub fn calls(&self) -> Vec<Vec<OsString>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl EngineRunner for ScriptedRunner {
    fn run(&self, argv: &[OsString], _timeout: Duration) -> Result<ExecutionOutcome, InvokeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(argv.to_vec());
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or_else(|| {
                Err(InvokeError::io(
                    "scripted runner",
                    io::Error::other("no scripted outcome left"),
                ))
            })
    }
}
