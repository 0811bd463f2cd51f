//! Live reload channel backed by an SSE endpoint.
//!
//! The channel owns a broadcast sender; an axum server on the loopback
//! interface exposes `/events` as a server-sent-event stream, and every
//! connected client gets its own subscription. If the port is already taken
//! the server logs a warning and the watch session continues without live
//! reload; that is not worth aborting a rebuild loop over.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use super::{ReloadChannel, ReloadEvent};

const CHANNEL_CAPACITY: usize = 64;

/// Broadcast fan-out to every connected SSE client.
pub struct LiveReloadChannel {
    tx: broadcast::Sender<String>,
}

impl LiveReloadChannel {
    /// Create the channel and spawn its server on `127.0.0.1:port`. Must be
    /// called from within a tokio runtime.
    pub fn start(port: u16) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let server_tx = tx.clone();
        tokio::spawn(async move {
            serve(port, server_tx).await;
        });
        Self { tx }
    }

    /// Subscribe directly, bypassing the HTTP layer.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl ReloadChannel for LiveReloadChannel {
    fn broadcast(&self, event: &ReloadEvent) {
        match serde_json::to_string(event) {
            // A send error just means no client is connected right now.
            Ok(json) => {
                let _ = self.tx.send(json);
            }
            Err(err) => warn!(%err, "could not serialize reload event"),
        }
    }
}

async fn serve(port: u16, tx: broadcast::Sender<String>) {
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            warn!(%err, port, "reload port unavailable; continuing without live reload");
            return;
        }
    };
    info!(%addr, "reload channel listening");

    let app = Router::new().route("/events", get(events)).with_state(tx);
    if let Err(err) = axum::serve(listener, app).await {
        warn!(%err, "reload channel stopped");
    }
}

async fn events(
    State(tx): State<broadcast::Sender<String>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(tx.subscribe())
        .filter_map(|msg| msg.ok().map(|data| Ok::<_, Infallible>(Event::default().data(data))));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
