//! Build, clean, and packaging stages for the wext extension packager.
//!
//! The crate is organized by pipeline stage:
//!
//! - [`clean`] - the clean-build controller, the run's serialization point
//! - [`transform`] - collaborator traits for script/stylesheet transformation
//! - [`assets`] - script bundles, aggregated stylesheets, static asset copies
//! - [`manifest`] - version injection into the extension manifest
//! - [`pages`] - HTML shell generation per UI page
//! - [`package`] - archiving into the browser's container format
//! - [`pipeline`] - the orchestrator and its state machine
//!
//! Failures carry the stage they happened in ([`error::PipelineError`]); no
//! stage retries automatically.

pub mod assets;
pub mod clean;
pub mod error;
pub mod manifest;
pub mod package;
pub mod pages;
pub mod pipeline;
pub mod transform;

pub use error::{PipelineError, Result, Stage, StageError};
pub use pipeline::{BuildReport, Pipeline, PipelineState};
pub use transform::{PassthroughTransformer, ScriptTransformer, StyleTransformer};
