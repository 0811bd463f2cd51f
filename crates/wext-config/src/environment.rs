//! Build environment resolution.
//!
//! A [`BuildEnvironment`] is constructed exactly once per invocation and
//! threaded by reference through every pipeline stage. It also carries the
//! constants that would otherwise live as scattered globals: the dist root,
//! the reload channel port, and the archive compression level.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::layout::OutputLayout;

/// Environment variable naming the build mode.
pub const MODE_VAR: &str = "NODE_ENV";

/// Environment variable naming the target browser.
pub const BROWSER_VAR: &str = "TARGET_BROWSER";

/// Fixed port the development reload channel listens on.
pub const RELOAD_PORT: u16 = 9090;

/// Fixed deflate level for the output archive.
pub const COMPRESSION_LEVEL: i64 = 6;

/// Build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Parse a mode selector. Anything other than `development` (including
    /// an absent value) is production.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("development") => Mode::Development,
            _ => Mode::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Mode::Development)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target browser family.
///
/// Unrecognized identifiers are carried through as [`BrowserId::Other`] and
/// package as plain zip. That silent fallback mirrors the original build
/// configuration and is covered by tests; tightening it to an error would be
/// a behavioral change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserId {
    Chrome,
    Firefox,
    Opera,
    Edge,
    #[serde(untagged)]
    Other(String),
}

impl BrowserId {
    pub fn parse(value: &str) -> Self {
        match value {
            "chrome" => BrowserId::Chrome,
            "firefox" => BrowserId::Firefox,
            "opera" => BrowserId::Opera,
            "edge" => BrowserId::Edge,
            other => BrowserId::Other(other.to_string()),
        }
    }

    /// Total mapping from browser family to archive container format.
    pub fn archive_format(&self) -> ArchiveFormat {
        match self {
            BrowserId::Opera => ArchiveFormat::Crx,
            BrowserId::Firefox => ArchiveFormat::Xpi,
            _ => ArchiveFormat::Zip,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BrowserId::Chrome => "chrome",
            BrowserId::Firefox => "firefox",
            BrowserId::Opera => "opera",
            BrowserId::Edge => "edge",
            BrowserId::Other(name) => name,
        }
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container format of the final archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Crx,
    Xpi,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Crx => "crx",
            ArchiveFormat::Xpi => "xpi",
        }
    }
}

/// Resolved build environment, constructed once per invocation.
#[derive(Debug, Clone)]
pub struct BuildEnvironment {
    pub mode: Mode,
    pub browser: BrowserId,
    /// Dist directory, relative to the project root.
    pub dist_root: PathBuf,
    /// Port for the development reload channel.
    pub reload_port: u16,
    /// Deflate level used by the target packager.
    pub compression_level: i64,
}

impl BuildEnvironment {
    pub fn new(mode: Mode, browser: BrowserId) -> Self {
        Self {
            mode,
            browser,
            dist_root: PathBuf::from("dist"),
            reload_port: RELOAD_PORT,
            compression_level: COMPRESSION_LEVEL,
        }
    }

    /// Resolve the environment from explicit flags, falling back to the
    /// `NODE_ENV` / `TARGET_BROWSER` process environment.
    ///
    /// The mode defaults to production. The target browser has no default:
    /// both the output path and the archive format depend on it, so absence
    /// is a configuration error.
    pub fn resolve(mode_flag: Option<&str>, browser_flag: Option<&str>) -> Result<Self> {
        let mode_env = std::env::var(MODE_VAR).ok();
        let mode = Mode::parse(mode_flag.or(mode_env.as_deref()));

        let browser_env = std::env::var(BROWSER_VAR).ok();
        let browser = browser_flag
            .or(browser_env.as_deref())
            .filter(|value| !value.trim().is_empty())
            .map(BrowserId::parse)
            .ok_or(ConfigError::MissingTargetBrowser)?;

        Ok(Self::new(mode, browser))
    }

    /// Derive the output layout for this environment under `project_root`.
    pub fn layout_under(&self, project_root: &Path) -> OutputLayout {
        OutputLayout::new(
            &project_root.join(&self.dist_root),
            self.mode,
            &self.browser,
        )
    }

    pub fn is_development(&self) -> bool {
        self.mode.is_development()
    }
}
