//! Clean-build controller.
//!
//! Guarantees a known-empty starting state for the active (mode, browser)
//! pair: the prior output root and the prior archive for that pair are
//! removed, and nothing else. This is the pipeline's serialization point; a
//! deletion failure is fatal because building onto a possibly-stale tree
//! would undermine reproducibility.

use std::path::Path;

use tracing::debug;
use wext_config::OutputLayout;

use crate::error::StageError;

/// Remove the previous output directory and archive for this layout's pair.
pub fn clean(layout: &OutputLayout) -> Result<(), StageError> {
    remove_dir(layout.root())?;
    remove_file(layout.archive_path())?;
    Ok(())
}

fn remove_dir(path: &Path) -> Result<(), StageError> {
    if path.exists() {
        debug!(path = %path.display(), "removing stale output directory");
        std::fs::remove_dir_all(path).map_err(|source| StageError::Cleanup {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn remove_file(path: &Path) -> Result<(), StageError> {
    if path.exists() {
        debug!(path = %path.display(), "removing stale archive");
        std::fs::remove_file(path).map_err(|source| StageError::Cleanup {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
