//! wext CLI library.
//!
//! The binary in `main.rs` is a thin shell over these modules:
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - the `build` and `watch` handlers
//! - [`reload`] - development reload channel and file watcher
//! - [`logger`] - tracing subscriber setup
//! - [`error`] - the CLI error type

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod reload;

pub use error::{CliError, Result};
