//! rustbom CLI library
//!
//! The binary in `main.rs` is a thin wrapper around these modules so that
//! argument parsing, error mapping and command handlers can be tested directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
