//! Deterministic, pure logic for engine invocations.
//!
//! Core modules must be free of I/O side effects, with one exception:
//! [`types::InvocationRequest::new`] checks that the module file is readable
//! so that no invalid request can exist.

pub mod classifier;
pub mod command;
pub mod literal;
pub mod result_parser;
pub mod types;
