//! Command-line interface definitions using clap.
//!
//! Flags mirror the process environment: `--mode` falls back to `NODE_ENV`
//! and `--browser` to `TARGET_BROWSER`, with the flag winning when both are
//! set. The browser stays optional at the clap level so a missing value
//! surfaces as a configuration error with a hint, not a usage error.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// wext - build and package browser extensions per target browser.
#[derive(Parser, Debug)]
#[command(name = "wext")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the extension once and package it
    Build(BuildArgs),

    /// Rebuild on source changes, serving reload events in development mode
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Build mode; anything other than "development" is production
    #[arg(long, env = "NODE_ENV", value_name = "MODE")]
    pub mode: Option<String>,

    /// Target browser family (chrome, firefox, opera, edge, ...)
    #[arg(long, env = "TARGET_BROWSER", value_name = "BROWSER")]
    pub browser: Option<String>,

    /// Project root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Build mode; anything other than "development" is production
    #[arg(long, env = "NODE_ENV", value_name = "MODE")]
    pub mode: Option<String>,

    /// Target browser family (chrome, firefox, opera, edge, ...)
    #[arg(long, env = "TARGET_BROWSER", value_name = "BROWSER")]
    pub browser: Option<String>,

    /// Project root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Port for the development reload channel
    #[arg(long, default_value_t = wext_config::RELOAD_PORT)]
    pub port: u16,
}
