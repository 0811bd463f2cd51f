//! Watch command: rebuild on source changes and notify connected clients.
//!
//! The loop runs an initial build, then reacts to debounced file events. A
//! change is mapped back to its build unit through the entry graph; files
//! that belong to no unit are ignored without a rebuild. Rebuild failures are
//! logged and the session keeps watching, so a mid-edit syntax error does not
//! kill the loop. The reload channel only carries events in development mode.

use std::path::Path;

use tracing::{debug, error, info};
use wext_config::{BuildEnvironment, ProjectConfig};
use wext_pipeline::Pipeline;

use crate::cli::WatchArgs;
use crate::error::Result;
use crate::reload::{self, FileChange, FileWatcher, ReloadChannel, ReloadEvent};

const DEBOUNCE_MS: u64 = 100;

pub async fn execute(args: WatchArgs) -> Result<()> {
    let mut env = BuildEnvironment::resolve(args.mode.as_deref(), args.browser.as_deref())?;
    env.reload_port = args.port;

    // Watcher events carry absolute paths; canonicalize once so changed
    // paths can be made project-relative for graph lookup.
    let root = args.root.canonicalize()?;
    let project = ProjectConfig::load(&root)?;
    let pipeline = Pipeline::new(env.clone(), project)?;

    info!(mode = %env.mode, browser = %env.browser, "starting watch session");
    pipeline.run().await?;

    // The channel comes up after the first successful build, so clients never
    // connect to a session that has nothing on disk yet.
    let channel = reload::channel_for(&env);

    let ignore = vec![
        env.dist_root.to_string_lossy().into_owned(),
        "node_modules".to_string(),
        "target".to_string(),
    ];
    let (watcher, mut changes) = FileWatcher::new(root.clone(), ignore, DEBOUNCE_MS)?;
    info!(path = %watcher.root().display(), "watching for changes");

    loop {
        tokio::select! {
            Some(change) = changes.recv() => {
                handle_change(&change, &pipeline, channel.as_ref(), &root).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch session");
                break;
            }
        }
    }
    Ok(())
}

async fn handle_change(
    change: &FileChange,
    pipeline: &Pipeline,
    channel: &dyn ReloadChannel,
    root: &Path,
) {
    let rel = change.path().strip_prefix(root).unwrap_or(change.path());
    let Some(unit) = pipeline.graph().unit_for_source(rel) else {
        debug!(path = %rel.display(), "change outside any build unit, skipping");
        return;
    };
    let unit_name = unit.name.clone();

    info!(unit = %unit_name, path = %rel.display(), "source changed, rebuilding");
    match pipeline.run().await {
        Ok(report) => {
            info!(archive = %report.archive.display(), "rebuild succeeded");
            if let Some(class) = pipeline.graph().unit_class(&unit_name) {
                channel.broadcast(&ReloadEvent::new(&unit_name, class));
            } else {
                // Manifest changes rebuild the tree but carry no unit class.
                // TODO: emit a full-extension reload when the manifest unit
                // changes, once clients handle that action.
                debug!(unit = %unit_name, "rebuilt without a reload event");
            }
        }
        Err(err) => error!(%err, "rebuild failed; still watching"),
    }
}
