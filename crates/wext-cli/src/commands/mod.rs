//! Command handlers for the wext CLI.

pub mod build;
pub mod watch;

pub use build::execute as build_execute;
pub use watch::execute as watch_execute;
