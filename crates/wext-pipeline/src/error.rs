//! Stage-tagged error types for the build pipeline.
//!
//! Every failure names the stage it happened in, so the CLI can report
//! `Failed(stage, cause)` and exit non-zero without guessing where the
//! pipeline stopped.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline stage names, used for error attribution and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    Scripts,
    Styles,
    Assets,
    Manifest,
    Pages,
    Package,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Scripts => "scripts",
            Stage::Styles => "styles",
            Stage::Assets => "assets",
            Stage::Manifest => "manifest",
            Stage::Pages => "pages",
            Stage::Package => "package",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline failure: the stage that failed plus its cause.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

/// Causes of stage failures.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("cannot remove stale output at {path}: {source}")]
    Cleanup {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transform failed for unit '{unit}': {message}")]
    Transform { unit: String, message: String },

    #[error("template not found: {0}")]
    TemplateNotFound(std::path::PathBuf),

    #[error("archive error: {0}")]
    Packaging(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("build task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StageError {
    /// Attach the failing stage.
    pub fn at(self, stage: Stage) -> PipelineError {
        PipelineError {
            stage,
            source: self,
        }
    }
}
