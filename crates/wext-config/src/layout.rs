//! Derived output layout for one (mode, browser) pair.
//!
//! All pipeline writes are confined under [`OutputLayout::root`]; the sibling
//! archive sits next to the root so the clean stage can remove both without
//! touching any other pair's output.

use std::path::{Path, PathBuf};

use crate::environment::{BrowserId, Mode};

/// Output tree for a single build: `dist/<mode>/<browser>` plus the sibling
/// archive `dist/<mode>/<browser>.<ext>`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    archive_path: PathBuf,
}

impl OutputLayout {
    pub fn new(dist_root: &Path, mode: Mode, browser: &BrowserId) -> Self {
        let pair_dir = dist_root.join(mode.as_str());
        let root = pair_dir.join(browser.as_str());
        let archive_name = format!(
            "{}.{}",
            browser.as_str(),
            browser.archive_format().extension()
        );
        let archive_path = pair_dir.join(archive_name);
        Self { root, archive_path }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn js_dir(&self) -> PathBuf {
        self.root.join("js")
    }

    pub fn css_dir(&self) -> PathBuf {
        self.root.join("css")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    pub fn page_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Bundle location for a script unit. A deterministic function of the
    /// unit name only; no content hashing.
    pub fn bundle_path(&self, unit: &str) -> PathBuf {
        self.js_dir().join(format!("{unit}.bundle.js"))
    }

    pub fn stylesheet_path(&self, unit: &str) -> PathBuf {
        self.css_dir().join(format!("{unit}.css"))
    }

    /// Root-relative script reference as it appears in generated pages.
    pub fn bundle_href(unit: &str) -> String {
        format!("js/{unit}.bundle.js")
    }

    /// Root-relative stylesheet reference as it appears in generated pages.
    pub fn stylesheet_href(unit: &str) -> String {
        format!("css/{unit}.css")
    }
}
