//! Running the engine as a child process with a hard timeout.

use std::ffi::OsString;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::types::ExecutionOutcome;
use crate::error::InvokeError;

/// Default wall-clock budget for one engine run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

type Drain = Receiver<io::Result<Vec<u8>>>;

/// Run `argv` and capture stdout/stderr without risking pipe deadlocks.
///
/// stdin is not connected. Both output pipes are drained on their own threads
/// while this thread waits for exit, so a child blocked on a full pipe always
/// makes progress. `timeout` is measured from the spawn and covers both the
/// exit and the end of both streams. If it elapses first the child is killed
/// and reaped, the drains are left to finish on their own, and their output
/// is dropped.
///
/// A nonzero exit status is not an error here; it is returned in the outcome.
#[instrument(skip_all, fields(timeout_ms = timeout.as_millis() as u64, argc = argv.len()))]
pub fn run_invocation(
    argv: &[OsString],
    timeout: Duration,
) -> Result<ExecutionOutcome, InvokeError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(InvokeError::Launch {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty argument vector"),
        });
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program = %program.to_string_lossy(), "spawning engine");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, program = %program.to_string_lossy(), "failed to spawn engine");
            return Err(InvokeError::Launch {
                program: program.to_string_lossy().into_owned(),
                source: e,
            });
        }
    };
    let started = Instant::now();

    let (stdout, stderr) = match start_drains(&mut child) {
        Ok(drains) => drains,
        Err(e) => {
            kill_and_reap(&mut child);
            return Err(e);
        }
    };

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "engine timed out, killing");
            kill_and_reap(&mut child);
            return Err(InvokeError::Timeout { timeout });
        }
        Err(e) => {
            kill_and_reap(&mut child);
            return Err(InvokeError::io("wait for engine", e));
        }
    };

    // The engine has exited, but anything it spawned may still hold the pipes.
    let Some(stdout) = recv_drain(&stdout, timeout, started, "read engine stdout")? else {
        warn!(timeout_ms = timeout.as_millis() as u64, "engine output still open at timeout");
        return Err(InvokeError::Timeout { timeout });
    };
    let Some(stderr) = recv_drain(&stderr, timeout, started, "read engine stderr")? else {
        warn!(timeout_ms = timeout.as_millis() as u64, "engine output still open at timeout");
        return Err(InvokeError::Timeout { timeout });
    };

    let exit_code = exit_code_of(status);
    debug!(exit_code, stdout_bytes = stdout.len(), stderr_bytes = stderr.len(), "engine finished");
    Ok(ExecutionOutcome {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code,
    })
}

fn start_drains(child: &mut Child) -> Result<(Drain, Drain), InvokeError> {
    let stdout = child.stdout.take().ok_or_else(|| {
        InvokeError::io("take stdout", io::Error::other("stdout was not piped"))
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        InvokeError::io("take stderr", io::Error::other("stderr was not piped"))
    })?;
    Ok((
        spawn_drain("wasm-stdout", stdout)?,
        spawn_drain("wasm-stderr", stderr)?,
    ))
}

fn spawn_drain<R: Read + Send + 'static>(name: &str, reader: R) -> Result<Drain, InvokeError> {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            // Nobody is listening once the invocation has timed out.
            let _ = tx.send(read_stream(reader));
        })
        .map_err(|e| InvokeError::io("spawn output reader", e))?;
    Ok(rx)
}

/// Wait for a drain until `timeout` after `started`. `None` means the budget
/// ran out first.
fn recv_drain(
    drain: &Drain,
    timeout: Duration,
    started: Instant,
    context: &'static str,
) -> Result<Option<Vec<u8>>, InvokeError> {
    match drain.recv_timeout(timeout.saturating_sub(started.elapsed())) {
        Ok(Ok(buf)) => Ok(Some(buf)),
        Ok(Err(e)) => Err(InvokeError::io(context, e)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(InvokeError::io(
            context,
            io::Error::other("output reader thread panicked"),
        )),
    }
}

/// Kill the engine and collect its status. Both steps are best effort: the
/// child may already have exited.
fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!(err = %e, "kill engine");
    }
    if let Err(e) = child.wait() {
        warn!(err = %e, "reap engine");
    }
}

fn read_stream<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Integer exit status. Signal deaths on Unix map to `128 + signal`; `-1`
/// when neither is available.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
