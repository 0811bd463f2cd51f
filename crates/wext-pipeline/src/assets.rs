//! Asset pipeline: script bundles, aggregated stylesheets, and verbatim
//! static-asset copies.
//!
//! Output filenames are a deterministic function of the unit name only, so
//! re-running a build with unchanged inputs reproduces identical filenames.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use wext_config::{EntryGraph, Mode, OutputLayout, ProjectConfig};

use crate::error::StageError;
use crate::transform::{discover_stylesheets, ScriptTransformer, StyleTransformer};

/// Bundle every script unit into `js/<name>.bundle.js`.
///
/// Returns the number of bundles written. A transformer failure is reported
/// with the offending unit's name.
pub fn bundle_scripts(
    graph: &EntryGraph,
    project: &ProjectConfig,
    layout: &OutputLayout,
    transformer: &dyn ScriptTransformer,
    mode: Mode,
) -> Result<usize, StageError> {
    std::fs::create_dir_all(layout.js_dir())?;

    let mut written = 0;
    for unit in graph.script_units() {
        let source = project.resolve(&unit.source);
        let bundle = transformer
            .bundle_script(&unit.name, &source, mode)
            .map_err(|err| StageError::Transform {
                unit: unit.name.clone(),
                message: err.to_string(),
            })?;
        let out = layout.bundle_path(&unit.name);
        std::fs::write(&out, bundle)?;
        debug!(unit = %unit.name, path = %out.display(), "wrote script bundle");
        written += 1;
    }
    Ok(written)
}

/// Aggregate the stylesheets reachable from each script unit into
/// `css/<name>.css`. Units without style imports emit nothing.
///
/// Returns the names of units that produced a stylesheet; the page generator
/// uses this to decide which `<link>` tags to inject.
pub fn bundle_styles(
    graph: &EntryGraph,
    project: &ProjectConfig,
    layout: &OutputLayout,
    transformer: &dyn StyleTransformer,
    mode: Mode,
) -> Result<BTreeSet<String>, StageError> {
    let mut styled = BTreeSet::new();
    for unit in graph.script_units() {
        let source = project.resolve(&unit.source);
        let sheets = discover_stylesheets(&source).map_err(|err| StageError::Transform {
            unit: unit.name.clone(),
            message: err.to_string(),
        })?;
        if sheets.is_empty() {
            continue;
        }

        let aggregated = transformer
            .aggregate_styles(&unit.name, &sheets, mode)
            .map_err(|err| StageError::Transform {
                unit: unit.name.clone(),
                message: err.to_string(),
            })?;

        std::fs::create_dir_all(layout.css_dir())?;
        let out = layout.stylesheet_path(&unit.name);
        std::fs::write(&out, aggregated)?;
        debug!(unit = %unit.name, sheets = sheets.len(), "wrote aggregated stylesheet");
        styled.insert(unit.name.clone());
    }
    Ok(styled)
}

/// Copy the static assets tree byte-for-byte into `assets/`, preserving
/// relative paths. A project without a static assets directory copies
/// nothing.
pub fn copy_static_assets(
    project: &ProjectConfig,
    layout: &OutputLayout,
) -> Result<usize, StageError> {
    let source_dir = project.resolve(&project.static_assets);
    if !source_dir.is_dir() {
        debug!(path = %source_dir.display(), "no static assets directory, skipping");
        return Ok(0);
    }

    let dest_root = layout.assets_dir();
    let mut copied = 0;
    for entry in WalkDir::new(&source_dir).sort_by_file_name() {
        let entry = entry.map_err(|err| StageError::Io(err.into()))?;
        let rel = entry
            .path()
            .strip_prefix(&source_dir)
            .expect("walkdir yields paths under its root");
        let dest = dest_root.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest)?;
        } else {
            copy_file(entry.path(), &dest)?;
            copied += 1;
        }
    }
    debug!(count = copied, "copied static assets");
    Ok(copied)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), StageError> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(from, to)?;
    Ok(())
}
