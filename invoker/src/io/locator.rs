//! Discovery of an installed WebAssembly engine.
//!
//! Candidates are resolved through the executable search path in a fixed
//! order; the first hit wins. On Windows a short list of well-known install
//! locations is tried when the search path has nothing.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::core::types::RuntimeDescriptor;
use crate::error::InvokeError;

/// Engine names probed by default, in priority order.
pub const DEFAULT_CANDIDATES: &[&str] = &["wasmtime", "wasmer"];

const WINDOWS_INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\Wasmtime\bin\wasmtime.exe",
    r"C:\Program Files\Wasmer\bin\wasmer.exe",
];

/// Well-known absolute install paths for an OS family (`std::env::consts::OS`).
pub fn fallback_install_paths(os: &str) -> Vec<PathBuf> {
    match os {
        "windows" => WINDOWS_INSTALL_PATHS.iter().map(PathBuf::from).collect(),
        _ => Vec::new(),
    }
}

/// Probing strategy for a single engine.
///
/// Construction does no I/O; [`RuntimeLocator::locate`] probes the
/// filesystem each time it is called. Memoization belongs to the caller.
#[derive(Debug, Clone)]
pub struct RuntimeLocator {
    /// Explicit engine path. When set, nothing else is probed.
    explicit: Option<PathBuf>,
    candidates: Vec<String>,
    search_dirs: Vec<PathBuf>,
    fallback_paths: Vec<PathBuf>,
}

impl RuntimeLocator {
    /// Locator over `PATH` and the host's fallback install paths.
    pub fn from_env<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let search_dirs = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self {
            explicit: None,
            candidates: candidates.into_iter().map(Into::into).collect(),
            search_dirs,
            fallback_paths: fallback_install_paths(env::consts::OS),
        }
    }

    /// Locator with an explicit search path and fallback list.
    pub fn with_search_dirs<I, S>(
        candidates: I,
        search_dirs: Vec<PathBuf>,
        fallback_paths: Vec<PathBuf>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            explicit: None,
            candidates: candidates.into_iter().map(Into::into).collect(),
            search_dirs,
            fallback_paths,
        }
    }

    /// Use `path` as the engine instead of probing.
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    #[instrument(skip_all, fields(candidates = ?self.candidates))]
    pub fn locate(&self) -> Result<RuntimeDescriptor, InvokeError> {
        if let Some(path) = &self.explicit {
            return if is_executable(path) {
                let descriptor = RuntimeDescriptor::new(absolute(path));
                info!(engine = %descriptor.path().display(), "using configured engine");
                Ok(descriptor)
            } else {
                Err(InvokeError::RuntimeNotFound {
                    tried: vec![path.display().to_string()],
                })
            };
        }

        for candidate in &self.candidates {
            if let Some(path) = self.search(candidate) {
                let descriptor = RuntimeDescriptor::new(absolute(&path));
                info!(engine = %descriptor.path().display(), "found engine on search path");
                return Ok(descriptor);
            }
            debug!(candidate = %candidate, "engine not on search path");
        }

        for path in &self.fallback_paths {
            if path.is_file() {
                info!(engine = %path.display(), "found engine at install path");
                return Ok(RuntimeDescriptor::new(path.clone()));
            }
        }

        let mut tried = self.candidates.clone();
        tried.extend(self.fallback_paths.iter().map(|p| p.display().to_string()));
        Err(InvokeError::RuntimeNotFound { tried })
    }

    fn search(&self, name: &str) -> Option<PathBuf> {
        let file_names = executable_names(name);
        self.search_dirs.iter().find_map(|dir| {
            file_names
                .iter()
                .map(|file_name| dir.join(file_name))
                .find(|path| is_executable(path))
        })
    }
}

fn executable_names(name: &str) -> Vec<OsString> {
    if cfg!(windows) && Path::new(name).extension().is_none() {
        vec![OsString::from(format!("{name}.exe")), OsString::from(name)]
    } else {
        vec![OsString::from(name)]
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::write_executable;

    #[test]
    fn first_candidate_wins_over_earlier_directory() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        write_executable(first.path(), "wasmer", "#!/bin/sh\n").expect("wasmer");
        let wasmtime =
            write_executable(second.path(), "wasmtime", "#!/bin/sh\n").expect("wasmtime");

        let locator = RuntimeLocator::with_search_dirs(
            DEFAULT_CANDIDATES.iter().copied(),
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            Vec::new(),
        );
        let descriptor = locator.locate().expect("locate");
        assert_eq!(descriptor.path(), wasmtime);
    }

    #[test]
    fn falls_through_to_later_candidate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let wasmer = write_executable(dir.path(), "wasmer", "#!/bin/sh\n").expect("wasmer");

        let locator = RuntimeLocator::with_search_dirs(
            DEFAULT_CANDIDATES.iter().copied(),
            vec![dir.path().to_path_buf()],
            Vec::new(),
        );
        assert_eq!(locator.locate().expect("locate").path(), wasmer);
    }

    #[test]
    fn skips_non_executable_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("wasmtime"), "not executable").expect("write");

        let locator = RuntimeLocator::with_search_dirs(
            ["wasmtime"],
            vec![dir.path().to_path_buf()],
            Vec::new(),
        );
        assert!(matches!(locator.locate(), Err(InvokeError::RuntimeNotFound { .. })));
    }

    #[test]
    fn uses_fallback_paths_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.exe");
        let present = dir.path().join("wasmer.exe");
        std::fs::write(&present, "").expect("write");

        let locator = RuntimeLocator::with_search_dirs(
            ["wasmtime"],
            Vec::new(),
            vec![missing, present.clone()],
        );
        assert_eq!(locator.locate().expect("locate").path(), present);
    }

    #[test]
    fn not_found_names_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let locator = RuntimeLocator::with_search_dirs(
            DEFAULT_CANDIDATES.iter().copied(),
            vec![dir.path().to_path_buf()],
            Vec::new(),
        );
        match locator.locate() {
            Err(InvokeError::RuntimeNotFound { tried }) => {
                assert_eq!(tried, vec!["wasmtime".to_string(), "wasmer".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn explicit_path_bypasses_search() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = write_executable(dir.path(), "custom-engine", "#!/bin/sh\n").expect("engine");

        let locator = RuntimeLocator::with_search_dirs(["wasmtime"], Vec::new(), Vec::new())
            .with_explicit_path(&engine);
        assert_eq!(locator.locate().expect("locate").path(), engine);

        let missing = RuntimeLocator::with_search_dirs(["wasmtime"], Vec::new(), Vec::new())
            .with_explicit_path(dir.path().join("nope"));
        assert!(matches!(missing.locate(), Err(InvokeError::RuntimeNotFound { .. })));
    }

    #[test]
    fn windows_has_fallback_paths_others_do_not() {
        assert_eq!(fallback_install_paths("windows").len(), 2);
        assert!(fallback_install_paths("linux").is_empty());
        assert!(fallback_install_paths("macos").is_empty());
    }
}
