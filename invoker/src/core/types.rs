//! Data model for a single engine invocation.
//!
//! Requests are validated once, at construction. Everything downstream of
//! [`InvocationRequest::new`] may assume a well-formed request.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::literal::is_integer_literal;
use crate::error::InvokeError;

/// Absolute path of a discovered engine executable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeDescriptor {
    path: PathBuf,
}

impl RuntimeDescriptor {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A validated request to call one exported function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    module_path: PathBuf,
    function_name: String,
    args: Vec<String>,
}

impl InvocationRequest {
    /// Validate and build a request.
    ///
    /// Checks, in order: function name is non-empty, every argument matches
    /// the integer literal grammar, the module exists, the module is a
    /// readable regular file. The first failing check is returned.
    pub fn new<P, S, I, A>(module_path: P, function_name: S, args: I) -> Result<Self, InvokeError>
    where
        P: Into<PathBuf>,
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let module_path = module_path.into();
        let function_name = function_name.into();
        if function_name.trim().is_empty() {
            return Err(InvokeError::EmptyFunctionName);
        }

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if let Some(bad) = args.iter().find(|arg| !is_integer_literal(arg)) {
            return Err(InvokeError::InvalidArgument {
                literal: bad.clone(),
            });
        }

        check_module_readable(&module_path)?;

        Ok(Self {
            module_path,
            function_name,
            args,
        })
    }

    /// Build a request without any checks.
    #[cfg(test)]
    pub(crate) fn unchecked(module_path: PathBuf, function_name: &str, args: &[&str]) -> Self {
        Self {
            module_path,
            function_name: function_name.to_string(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
        }
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn check_module_readable(path: &Path) -> Result<(), InvokeError> {
    let metadata = match path.metadata() {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(InvokeError::ModuleNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(InvokeError::ModuleNotReadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_file() {
        return Err(InvokeError::ModuleNotReadable {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    File::open(path).map_err(|source| InvokeError::ModuleNotReadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Raw result of one engine run that terminated on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// A validated integer literal returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedResult(String);

impl ParsedResult {
    pub(crate) fn new(literal: String) -> Self {
        Self(literal)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ParsedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_in(dir: &Path) -> PathBuf {
        let path = dir.join("add.wasm");
        std::fs::write(&path, b"\0asm\x01\0\0\0").expect("write module");
        path
    }

    #[test]
    fn builds_valid_request() {
        let temp = tempfile::tempdir().expect("tempdir");
        let module = module_in(temp.path());

        let request = InvocationRequest::new(&module, "add", ["1", "-2"]).expect("request");
        assert_eq!(request.module_path(), module);
        assert_eq!(request.function_name(), "add");
        assert_eq!(request.args(), ["1", "-2"]);
    }

    #[test]
    fn rejects_invalid_argument_by_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let module = module_in(temp.path());

        let err = InvocationRequest::new(&module, "add", ["1", "2x", "3.0"]).unwrap_err();
        assert!(
            matches!(&err, InvokeError::InvalidArgument { literal } if literal == "2x"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn rejects_missing_module() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err =
            InvocationRequest::new(temp.path().join("missing.wasm"), "add", ["1"]).unwrap_err();
        assert!(matches!(err, InvokeError::ModuleNotFound { .. }));
    }

    #[test]
    fn rejects_directory_as_module() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = InvocationRequest::new(temp.path(), "add", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, InvokeError::ModuleNotReadable { .. }));
    }

    #[test]
    fn rejects_empty_function_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let module = module_in(temp.path());
        let err = InvocationRequest::new(&module, "  ", ["1"]).unwrap_err();
        assert!(matches!(err, InvokeError::EmptyFunctionName));
    }

    #[test]
    fn argument_check_runs_before_module_check() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err =
            InvocationRequest::new(temp.path().join("missing.wasm"), "add", ["x"]).unwrap_err();
        assert!(matches!(err, InvokeError::InvalidArgument { .. }));
    }
}
