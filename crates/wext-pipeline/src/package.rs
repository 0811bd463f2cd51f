//! Target packager: compress the completed output tree into the browser's
//! container format.
//!
//! The archive's internal paths are relative to the output root, never
//! absolute, so unpacking yields the page/script/asset directories directly.
//! The deflate level is a fixed configuration constant carried on the build
//! environment, not derived at runtime.

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use wext_config::OutputLayout;

use crate::error::StageError;

/// Archive the output root into `root.<ext>` and return the archive path.
pub fn archive(layout: &OutputLayout, compression_level: i64) -> Result<PathBuf, StageError> {
    let root = layout.root();
    let archive_path = layout.archive_path().to_path_buf();

    let file = File::create(&archive_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(compression_level));

    let mut buffer = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| StageError::Io(err.into()))?;
        let rel = entry
            .path()
            .strip_prefix(root)
            .expect("walkdir yields paths under its root");
        if rel.as_os_str().is_empty() {
            continue;
        }
        // Zip spec mandates forward slashes regardless of host platform.
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            buffer.clear();
            File::open(entry.path())?.read_to_end(&mut buffer)?;
            writer.write_all(&buffer)?;
        }
    }

    writer.finish()?;
    debug!(path = %archive_path.display(), "wrote archive");
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use wext_config::{BrowserId, Mode};

    fn build_tree(layout: &OutputLayout) {
        std::fs::create_dir_all(layout.js_dir()).unwrap();
        std::fs::write(layout.bundle_path("background"), "bg();").unwrap();
        std::fs::write(layout.manifest_path(), "{}").unwrap();
    }

    #[test]
    fn archive_contains_relative_paths_only() {
        let dist = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dist.path(), Mode::Production, &BrowserId::Chrome);
        build_tree(&layout);

        let path = archive(&layout, 6).unwrap();
        assert_eq!(path.extension().unwrap(), "zip");

        let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let names: BTreeSet<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains("manifest.json"));
        assert!(names.contains("js/background.bundle.js"));
        assert!(names.iter().all(|name| !name.starts_with('/')));
    }

    #[test]
    fn firefox_archive_uses_xpi_extension() {
        let dist = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dist.path(), Mode::Production, &BrowserId::Firefox);
        build_tree(&layout);

        let path = archive(&layout, 6).unwrap();
        assert_eq!(path.extension().unwrap(), "xpi");
        assert!(path.is_file());
    }
}
