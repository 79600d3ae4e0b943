//! Library surface of the `neuroforge` binary.
//!
//! The command bodies live here rather than in `main.rs` so
//! integration tests can drive them directly with temporary paths.

pub mod commands;
