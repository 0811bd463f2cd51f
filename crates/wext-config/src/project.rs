//! Project configuration: `wext.config.json` loading and defaults.
//!
//! The compiled-in defaults reproduce the conventional extension layout:
//! background / content / in-page scripts plus the popup, prompt, options,
//! welcome and lsat UI pages, with HTML templates under `static/views` and
//! static assets under `static/assets`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::graph::{BuildUnit, EntryGraph, PageSpec, UnitRole};

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "wext.config.json";

/// One UI page declaration. Template, output filename, and bound entries all
/// default from the page name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<String>>,
}

impl PageConfig {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            template: None,
            filename: None,
            entries: None,
        }
    }
}

/// Project configuration, deserialized from [`CONFIG_FILE`] when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root every relative path below resolves against. Set at load
    /// time, never read from the file.
    #[serde(skip)]
    pub root: PathBuf,

    /// Script build units: name -> entry source path.
    pub entries: BTreeMap<String, PathBuf>,

    /// Manifest template path.
    pub manifest: PathBuf,

    /// UI pages.
    pub pages: Vec<PageConfig>,

    /// Directory of HTML templates, used when a page declares no template.
    pub views: PathBuf,

    /// Directory of static assets copied verbatim into the output.
    pub static_assets: PathBuf,

    /// Package descriptor exposing the external version string.
    pub package_json: PathBuf,

    /// Copy the package descriptor's version into the manifest.
    pub use_package_version: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let entries = [
            ("background", "src/extension/background-script/index.js"),
            ("contentScript", "src/extension/content-script/index.js"),
            ("inpageScript", "src/extension/inpage-script/index.js"),
            ("popup", "src/app/components/Popup/index.jsx"),
            ("prompt", "src/app/components/Prompt/index.jsx"),
            ("options", "src/app/components/Options/index.jsx"),
            ("welcome", "src/app/components/Welcome/index.jsx"),
            ("lsat", "src/extension/ln/lsat/index.js"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
        .collect();

        Self {
            root: PathBuf::from("."),
            entries,
            manifest: PathBuf::from("src/manifest.json"),
            pages: ["popup", "prompt", "options", "welcome", "lsat"]
                .iter()
                .map(|name| PageConfig::named(name))
                .collect(),
            views: PathBuf::from("static/views"),
            static_assets: PathBuf::from("static/assets"),
            package_json: PathBuf::from("package.json"),
            use_package_version: true,
        }
    }
}

impl ProjectConfig {
    /// Load the project configuration from `root`. A missing config file
    /// yields the defaults; an unparsable one is a configuration error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|source| ConfigError::InvalidJson {
                path: path.clone(),
                source,
            })?
        } else {
            Self::default()
        };
        config.root = root.to_path_buf();
        Ok(config)
    }

    /// Resolve a project-relative path against the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Build the validated entry graph for this project.
    pub fn entry_graph(&self) -> Result<EntryGraph> {
        let mut units: Vec<BuildUnit> = vec![BuildUnit {
            name: "manifest".to_string(),
            source: self.manifest.clone(),
            role: UnitRole::Manifest,
        }];

        for (name, source) in &self.entries {
            if name == "manifest" {
                return Err(ConfigError::InvalidValue(
                    "'manifest' is reserved for the manifest unit".to_string(),
                ));
            }
            units.push(BuildUnit {
                name: name.clone(),
                source: source.clone(),
                role: UnitRole::Script,
            });
        }

        let pages = self
            .pages
            .iter()
            .map(|page| PageSpec {
                template: page
                    .template
                    .clone()
                    .unwrap_or_else(|| self.views.join(format!("{}.html", page.name))),
                bound_entries: page
                    .entries
                    .clone()
                    .unwrap_or_else(|| vec![page.name.clone()]),
                output_filename: page
                    .filename
                    .clone()
                    .unwrap_or_else(|| format!("{}.html", page.name)),
            })
            .collect();

        EntryGraph::new(units, pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_graph_is_valid() {
        let graph = ProjectConfig::default().entry_graph().unwrap();
        assert_eq!(graph.script_units().count(), 8);
        assert_eq!(graph.pages().len(), 5);
        assert_eq!(graph.manifest_unit().source, Path::new("src/manifest.json"));

        let popup = graph
            .pages()
            .iter()
            .find(|p| p.output_filename == "popup.html")
            .unwrap();
        assert_eq!(popup.template, Path::new("static/views/popup.html"));
        assert_eq!(popup.bound_entries, vec!["popup".to_string()]);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config.root, dir.path());
        assert!(config.use_package_version);
    }

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{
                "entries": { "background": "src/bg.js" },
                "manifest": "src/manifest.json",
                "pages": [],
                "use_package_version": false
            }"#,
        )
        .unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config.entries.len(), 1);
        assert!(!config.use_package_version);
        assert_eq!(
            config.resolve(Path::new("src/bg.js")),
            dir.path().join("src/bg.js")
        );

        let graph = config.entry_graph().unwrap();
        assert_eq!(graph.script_units().count(), 1);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson { .. }));
    }

    #[test]
    fn reserved_manifest_name_is_rejected() {
        let mut config = ProjectConfig::default();
        config
            .entries
            .insert("manifest".to_string(), PathBuf::from("src/extra.js"));
        let err = config.entry_graph().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
