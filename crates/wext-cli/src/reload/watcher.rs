//! File system watcher with debouncing for the watch command.
//!
//! Watches the project root recursively and filters changes down to source
//! files, ignoring the dist tree, dependency directories, and hidden paths.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

/// File change event type.
#[derive(Debug, Clone)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive watcher that debounces rapid successive events on the same file,
/// so one editor save triggers one rebuild.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Watch `root` recursively. Returns the watcher (keep it alive for the
    /// session) and the receiving end of the change channel.
    pub fn new(
        root: PathBuf,
        ignore_dirs: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::DirectoryNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let watch_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            for path in &event.paths {
                if Self::should_ignore(path, &watch_root, &ignore_dirs) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };
                let _ = tx.blocking_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Paths outside the root, inside an ignored directory, or with any
    /// hidden component are dropped before debouncing.
    fn should_ignore(path: &Path, root: &Path, ignore_dirs: &[String]) -> bool {
        let Ok(rel) = path.strip_prefix(root) else {
            return true;
        };

        for component in rel.components() {
            let Some(name) = component.as_os_str().to_str() else {
                return true;
            };
            if ignore_dirs.iter().any(|dir| dir == name) {
                return true;
            }
            if name.starts_with('.') {
                return true;
            }
        }

        false
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
