//! The entry graph: the fixed set of build units and UI pages.
//!
//! The graph is declared at configuration time and validated eagerly, before
//! any I/O, so a dangling page binding fails as a precise configuration error
//! instead of a late build failure.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Output role of a build unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRole {
    /// Produces one script bundle under `js/`.
    Script,
    /// Produces the manifest; never emits a script bundle.
    Manifest,
}

/// One named build unit. Identity is the name, unique across the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildUnit {
    pub name: String,
    pub source: PathBuf,
    pub role: UnitRole,
}

/// One UI page: a template rendered into the output root, wired to the
/// bundles of its bound entries and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub template: PathBuf,
    pub bound_entries: Vec<String>,
    pub output_filename: String,
}

/// Reload classification of a script unit.
///
/// Units bound by a page are extension pages and get a full page reload on
/// change; everything else (background, content script, in-page script) is
/// re-injected without a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    ExtensionPage,
    WorkerScript,
}

/// Validated static graph of build units and page specs.
#[derive(Debug, Clone)]
pub struct EntryGraph {
    units: Vec<BuildUnit>,
    pages: Vec<PageSpec>,
}

impl EntryGraph {
    /// Construct and validate the graph. All checks run before any I/O:
    /// unit names unique, page filenames unique, every bound entry resolves
    /// to a script-role unit, and a manifest unit exists.
    pub fn new(units: Vec<BuildUnit>, pages: Vec<PageSpec>) -> Result<Self> {
        let graph = Self { units, pages };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for unit in &self.units {
            if !names.insert(unit.name.as_str()) {
                return Err(ConfigError::DuplicateUnit(unit.name.clone()));
            }
        }

        if !self
            .units
            .iter()
            .any(|unit| unit.role == UnitRole::Manifest)
        {
            return Err(ConfigError::MissingManifest);
        }

        let mut filenames = HashSet::new();
        for page in &self.pages {
            if !filenames.insert(page.output_filename.as_str()) {
                return Err(ConfigError::DuplicatePage(page.output_filename.clone()));
            }

            for entry in &page.bound_entries {
                match self.unit(entry) {
                    None => {
                        return Err(ConfigError::DanglingPageBinding {
                            page: page.output_filename.clone(),
                            entry: entry.clone(),
                        })
                    }
                    Some(unit) if unit.role != UnitRole::Script => {
                        return Err(ConfigError::PageBindsNonScript {
                            page: page.output_filename.clone(),
                            entry: entry.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    pub fn units(&self) -> &[BuildUnit] {
        &self.units
    }

    pub fn pages(&self) -> &[PageSpec] {
        &self.pages
    }

    pub fn unit(&self, name: &str) -> Option<&BuildUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    pub fn script_units(&self) -> impl Iterator<Item = &BuildUnit> {
        self.units
            .iter()
            .filter(|unit| unit.role == UnitRole::Script)
    }

    /// The manifest unit. Guaranteed present by validation.
    pub fn manifest_unit(&self) -> &BuildUnit {
        self.units
            .iter()
            .find(|unit| unit.role == UnitRole::Manifest)
            .expect("validated graph always has a manifest unit")
    }

    /// Reload classification for a script unit; `None` for unknown names and
    /// the manifest unit.
    pub fn unit_class(&self, name: &str) -> Option<UnitClass> {
        let unit = self.unit(name)?;
        if unit.role != UnitRole::Script {
            return None;
        }
        let bound = self
            .pages
            .iter()
            .any(|page| page.bound_entries.iter().any(|entry| entry == name));
        Some(if bound {
            UnitClass::ExtensionPage
        } else {
            UnitClass::WorkerScript
        })
    }

    /// Map a changed source path to the unit that owns it.
    ///
    /// A path belongs to the unit whose source file it is, or whose source
    /// directory is its closest containing directory when several units
    /// nest under each other.
    pub fn unit_for_source(&self, changed: &Path) -> Option<&BuildUnit> {
        if let Some(unit) = self.units.iter().find(|unit| unit.source == changed) {
            return Some(unit);
        }

        self.units
            .iter()
            .filter_map(|unit| {
                let dir = unit.source.parent()?;
                if changed.starts_with(dir) {
                    Some((dir.components().count(), unit))
                } else {
                    None
                }
            })
            .max_by_key(|(depth, _)| *depth)
            .map(|(_, unit)| unit)
    }
}
