//! Configuration layer for the wext extension packager.
//!
//! This crate owns everything that is decided before any filesystem write
//! happens:
//!
//! - [`environment`] - resolving `{mode, target browser}` from flags or the
//!   process environment, plus the fixed pipeline constants (dist root,
//!   reload port, compression level)
//! - [`graph`] - the validated entry graph of build units and UI pages
//! - [`project`] - `wext.config.json` loading with compiled-in defaults
//! - [`layout`] - the derived `dist/<mode>/<browser>` output tree
//!
//! Validation is eager: duplicate unit names, dangling page bindings, and a
//! missing target browser are all reported as [`ConfigError`] before the
//! pipeline touches the disk.

pub mod environment;
pub mod error;
pub mod graph;
pub mod layout;
pub mod project;

pub use environment::{
    ArchiveFormat, BrowserId, BuildEnvironment, Mode, BROWSER_VAR, COMPRESSION_LEVEL, MODE_VAR,
    RELOAD_PORT,
};
pub use error::{ConfigError, Result};
pub use graph::{BuildUnit, EntryGraph, PageSpec, UnitClass, UnitRole};
pub use layout::OutputLayout;
pub use project::{PageConfig, ProjectConfig};
