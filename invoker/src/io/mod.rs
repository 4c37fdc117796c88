//! I/O helpers: engine discovery, process execution, configuration.

pub mod config;
pub mod executor;
pub mod locator;
pub mod process;
