//! Error types for the wext CLI.
//!
//! Errors from the config and pipeline layers convert into [`CliError`] via
//! `From`, so command handlers stay `?`-only. The top of `main` prints the
//! error and its source chain, which for pipeline failures names the stage
//! that failed.

use std::path::PathBuf;

use thiserror::Error;
use wext_config::ConfigError;
use wext_pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Project or environment configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A pipeline stage failed; the inner error names the stage.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The file watcher could not be set up.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Watch root does not exist.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts() {
        let err: CliError = ConfigError::MissingTargetBrowser.into();
        assert!(err.to_string().contains("TARGET_BROWSER"));
    }
}
