//! Version injector for the extension manifest.
//!
//! The manifest template is parsed as JSON and written into the output root.
//! When the project opts in, the `version` field is copied verbatim from the
//! package descriptor; otherwise the manifest's own literal version is
//! retained unchanged. No other manifest field is touched.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use wext_config::{OutputLayout, ProjectConfig};

use crate::error::StageError;

/// The slice of `package.json` this pipeline reads: a single version string.
#[derive(Debug, Deserialize)]
struct PackageDescriptor {
    version: String,
}

/// Write the manifest into the output root, resolving its version field.
pub fn write_manifest(project: &ProjectConfig, layout: &OutputLayout) -> Result<(), StageError> {
    let manifest_path = project.resolve(&project.manifest);
    let raw = std::fs::read_to_string(&manifest_path)?;
    let mut manifest: Value = serde_json::from_str(&raw)?;

    if project.use_package_version {
        let version = read_package_version(&project.resolve(&project.package_json))?;
        debug!(%version, "injecting package version into manifest");
        manifest["version"] = Value::String(version);
    }

    let rendered = serde_json::to_string_pretty(&manifest)?;
    std::fs::create_dir_all(layout.root())?;
    std::fs::write(layout.manifest_path(), rendered)?;
    Ok(())
}

fn read_package_version(package_json: &Path) -> Result<String, StageError> {
    let raw = std::fs::read_to_string(package_json)?;
    let descriptor: PackageDescriptor = serde_json::from_str(&raw)?;
    Ok(descriptor.version)
}
