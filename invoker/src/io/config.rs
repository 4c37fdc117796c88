//! Invoker configuration loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::locator::{DEFAULT_CANDIDATES, RuntimeLocator};
use crate::io::process::DEFAULT_TIMEOUT;

/// Invoker configuration (TOML).
///
/// Missing fields take their defaults, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InvokerConfig {
    /// Wall-clock budget per engine run, in milliseconds.
    pub timeout_ms: u64,

    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit engine executable. Disables search-path probing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Engine names to probe on the search path, in order.
    pub candidates: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            engine: EngineConfig::default(),
        }
    }
}

impl InvokerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(anyhow!("timeout_ms must be > 0"));
        }
        if self.engine.candidates.is_empty() && self.engine.path.is_none() {
            return Err(anyhow!("engine.candidates must be non-empty when engine.path is unset"));
        }
        if self.engine.candidates.iter().any(|c| c.trim().is_empty()) {
            return Err(anyhow!("engine.candidates must not contain blank names"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Locator over the process search path honoring `engine.*`.
    pub fn locator(&self) -> RuntimeLocator {
        let locator = RuntimeLocator::from_env(self.engine.candidates.iter().cloned());
        match &self.engine.path {
            Some(path) => locator.with_explicit_path(path),
            None => locator,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `InvokerConfig::default()`.
pub fn load_config(path: &Path) -> Result<InvokerConfig> {
    if !path.exists() {
        let cfg = InvokerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: InvokerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Render the effective configuration as TOML.
pub fn render_config(config: &InvokerConfig) -> Result<String> {
    toml::to_string(config).context("serialize config")
}
