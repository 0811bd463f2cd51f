//! Development reload channel.
//!
//! In development mode the watch command broadcasts a [`ReloadEvent`] to
//! connected extension clients after every successful rebuild. In production
//! the channel is a [`NullReloadChannel`] that accepts and discards events,
//! so the rest of the watch loop never branches on the mode.

pub mod server;
pub mod watcher;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use wext_config::{BuildEnvironment, UnitClass};

pub use server::LiveReloadChannel;
pub use watcher::{FileChange, FileWatcher};

/// What a connected client should do with the rebuilt unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadAction {
    /// Reload the extension page hosting the unit.
    ReloadPage,
    /// Re-inject the background or content script.
    Reinject,
}

/// One rebuild notification, serialized as JSON on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadEvent {
    /// Name of the build unit whose source changed.
    pub unit: String,
    pub action: ReloadAction,
    /// Unix timestamp of the rebuild, seconds.
    pub timestamp: i64,
}

impl ReloadEvent {
    pub fn new(unit: &str, class: UnitClass) -> Self {
        let action = match class {
            UnitClass::ExtensionPage => ReloadAction::ReloadPage,
            UnitClass::WorkerScript => ReloadAction::Reinject,
        };
        Self {
            unit: unit.to_string(),
            action,
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
        }
    }
}

/// Sink for reload notifications. Sending never blocks and never fails; a
/// channel with no connected clients drops events on the floor.
pub trait ReloadChannel: Send + Sync {
    fn broadcast(&self, event: &ReloadEvent);
}

/// The production channel: accepts everything, notifies no one.
pub struct NullReloadChannel;

impl ReloadChannel for NullReloadChannel {
    fn broadcast(&self, _event: &ReloadEvent) {}
}

/// Pick the channel implementation for this environment. Development gets a
/// live channel listening on the environment's reload port; everything else
/// gets the null channel, so no port is opened.
pub fn channel_for(env: &BuildEnvironment) -> Arc<dyn ReloadChannel> {
    if env.is_development() {
        Arc::new(LiveReloadChannel::start(env.reload_port))
    } else {
        Arc::new(NullReloadChannel)
    }
}
