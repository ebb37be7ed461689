//! # chatcopy
//!
//! Headless driver for the copy pipeline: bootstrap (tracing, config,
//! adapter wiring) and the commands behind the `chatcopy` binary.

pub mod bootstrap;
pub mod commands;

pub use commands::{copy_message, copy_with_wiring, load_fixture, scan_fixture, CopyReport};
