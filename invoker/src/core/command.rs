//! Argument vector construction for the engine CLI.

use std::ffi::OsString;

use crate::core::literal::is_integer_literal;
use crate::core::types::{InvocationRequest, RuntimeDescriptor};
use crate::error::InvokeError;

/// Number of argv entries preceding the function arguments.
pub const FIXED_ARGV_LEN: usize = 5;

/// Build `[engine, "run", "--invoke", function, module, args...]`.
///
/// The flag order is fixed; engines that follow the `wasmtime` CLI rely on it.
/// Arguments are re-checked against the literal grammar even though
/// [`InvocationRequest::new`] already validated them.
pub fn build_invocation(
    runtime: &RuntimeDescriptor,
    request: &InvocationRequest,
) -> Result<Vec<OsString>, InvokeError> {
    let mut argv = Vec::with_capacity(FIXED_ARGV_LEN + request.args().len());
    argv.push(runtime.path().as_os_str().to_os_string());
    argv.push(OsString::from("run"));
    argv.push(OsString::from("--invoke"));
    argv.push(OsString::from(request.function_name()));
    argv.push(request.module_path().as_os_str().to_os_string());
    for arg in request.args() {
        if !is_integer_literal(arg) {
            return Err(InvokeError::InvalidArgument {
                literal: arg.clone(),
            });
        }
        argv.push(OsString::from(arg));
    }
    Ok(argv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn builds_fixed_shape() {
        let temp = tempfile::tempdir().expect("tempdir");
        let module = temp.path().join("math.wasm");
        std::fs::write(&module, b"\0asm").expect("write module");
        let runtime = RuntimeDescriptor::new(PathBuf::from("/usr/bin/wasmtime"));
        let request = InvocationRequest::new(&module, "add", ["40", "-2"]).expect("request");

        let argv = build_invocation(&runtime, &request).expect("argv");
        let expected: Vec<OsString> = vec![
            "/usr/bin/wasmtime".into(),
            "run".into(),
            "--invoke".into(),
            "add".into(),
            module.into_os_string(),
            "40".into(),
            "-2".into(),
        ];
        assert_eq!(argv, expected);
    }

    #[test]
    fn length_tracks_argument_count() {
        let temp = tempfile::tempdir().expect("tempdir");
        let module = temp.path().join("math.wasm");
        std::fs::write(&module, b"\0asm").expect("write module");
        let runtime = RuntimeDescriptor::new(PathBuf::from("/usr/bin/wasmtime"));

        for count in [0usize, 1, 2, 17] {
            let args: Vec<String> = (0..count).map(|i| format!("-{i}")).collect();
            let request = InvocationRequest::new(&module, "f", args).expect("request");
            let argv = build_invocation(&runtime, &request).expect("argv");
            assert_eq!(argv.len(), FIXED_ARGV_LEN + count);
        }
    }

    #[test]
    fn rejects_unvalidated_argument() {
        let runtime = RuntimeDescriptor::new(PathBuf::from("/usr/bin/wasmtime"));
        let request =
            InvocationRequest::unchecked(PathBuf::from("/tmp/m.wasm"), "f", &["1", "1;rm"]);
        let err = build_invocation(&runtime, &request).unwrap_err();
        assert!(matches!(err, InvokeError::InvalidArgument { literal } if literal == "1;rm"));
    }
}
