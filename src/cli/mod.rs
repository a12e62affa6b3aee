// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for decoding dumped tensors.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! console logging, and the `decode` and `skeleton` command implementations.

// Modules
/// CLI arguments.
pub mod args;

/// Decode command.
pub mod decode;

/// Console logging macros.
pub mod logging;
