//! Collaborator seams for script and stylesheet transformation.
//!
//! The pipeline does not parse or optimize anything itself; it hands each
//! script entry to a [`ScriptTransformer`] and each discovered stylesheet set
//! to a [`StyleTransformer`]. The default [`PassthroughTransformer`] copies
//! scripts verbatim and concatenates stylesheets, which is enough for the
//! orchestration semantics the pipeline owns.

use std::io;
use std::path::{Path, PathBuf};

use wext_config::Mode;

/// Produces a single bundled script artifact from an entry source.
pub trait ScriptTransformer: Send + Sync {
    fn bundle_script(&self, unit: &str, source: &Path, mode: Mode) -> io::Result<Vec<u8>>;
}

/// Aggregates the stylesheets reachable from a script entry into one sheet.
pub trait StyleTransformer: Send + Sync {
    fn aggregate_styles(&self, unit: &str, sheets: &[PathBuf], mode: Mode) -> io::Result<Vec<u8>>;
}

/// Default collaborator: verbatim copy and plain concatenation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTransformer;

impl ScriptTransformer for PassthroughTransformer {
    fn bundle_script(&self, _unit: &str, source: &Path, _mode: Mode) -> io::Result<Vec<u8>> {
        std::fs::read(source)
    }
}

impl StyleTransformer for PassthroughTransformer {
    fn aggregate_styles(&self, _unit: &str, sheets: &[PathBuf], _mode: Mode) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        for sheet in sheets {
            out.extend_from_slice(&std::fs::read(sheet)?);
            if !out.ends_with(b"\n") {
                out.push(b'\n');
            }
        }
        Ok(out)
    }
}

/// Discover stylesheets reachable from a script entry.
///
/// Scans the entry source line by line for `import` / `require` specifiers
/// ending in `.css`, `.scss` or `.sass`, resolved relative to the importing
/// file. Relative script imports (`.js`/`.jsx`/`.ts`/`.tsx`) are followed one
/// level deep and scanned the same way; deeper nesting is not traversed.
/// Only specifiers that resolve to existing files are returned, in source
/// order, each sheet once.
pub fn discover_stylesheets(entry: &Path) -> io::Result<Vec<PathBuf>> {
    let mut sheets = Vec::new();
    scan_for_stylesheets(entry, true, &mut sheets)?;
    Ok(sheets)
}

const STYLE_EXTENSIONS: [&str; 3] = [".css", ".scss", ".sass"];
const SCRIPT_EXTENSIONS: [&str; 4] = [".js", ".jsx", ".ts", ".tsx"];

fn scan_for_stylesheets(
    file: &Path,
    follow_scripts: bool,
    sheets: &mut Vec<PathBuf>,
) -> io::Result<()> {
    let source = std::fs::read_to_string(file)?;
    let base = file.parent().unwrap_or_else(|| Path::new("."));

    for line in source.lines() {
        let trimmed = line.trim_start();
        if !(trimmed.starts_with("import") || trimmed.contains("require(")) {
            continue;
        }
        let Some(specifier) = quoted_specifier(trimmed) else {
            continue;
        };

        let resolved = base.join(specifier.trim_start_matches("./"));
        if STYLE_EXTENSIONS.iter().any(|ext| specifier.ends_with(ext)) {
            if resolved.is_file() && !sheets.contains(&resolved) {
                sheets.push(resolved);
            }
        } else if follow_scripts
            && specifier.starts_with('.')
            && SCRIPT_EXTENSIONS.iter().any(|ext| specifier.ends_with(ext))
            && resolved.is_file()
        {
            scan_for_stylesheets(&resolved, false, sheets)?;
        }
    }
    Ok(())
}

/// Extract the first single- or double-quoted string from a line.
fn quoted_specifier(line: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        let mut parts = line.splitn(3, quote);
        parts.next()?;
        if let (Some(inner), Some(_)) = (parts.next(), parts.next()) {
            return Some(inner);
        }
    }
    None
}
