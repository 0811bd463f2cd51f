//! Error types for configuration resolution and entry-graph validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Environment resolution errors
    #[error("no target browser set\n\nHint: pass --browser <BROWSER> or set TARGET_BROWSER")]
    MissingTargetBrowser,

    // Entry graph validation errors (no filesystem checks)
    #[error("duplicate build unit name: {0}")]
    DuplicateUnit(String),

    #[error("duplicate page output filename: {0}")]
    DuplicatePage(String),

    #[error("page '{page}' is bound to unknown build unit '{entry}'")]
    DanglingPageBinding { page: String, entry: String },

    #[error("page '{page}' is bound to non-script unit '{entry}'")]
    PageBindsNonScript { page: String, entry: String },

    #[error("entry graph has no manifest unit")]
    MissingManifest,

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    // Project file loading errors
    #[error("failed to parse {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
