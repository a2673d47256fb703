//! Line-delimited TCP transport
//!
//! One persistent duplex connection per client, one frame per line. A single
//! shared state serializes every touch of the session manager, so no two
//! operations on the same pet ever run concurrently; the periodic push task
//! and the per-connection readers only interleave at lock boundaries.
//!
//! Teardown removes the outbox and the session under the same lock, so a
//! push interval that fires afterwards simply no longer sees the session.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::session::{SessionId, SessionManager};
use petling_core::WallClock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

struct Shared {
    manager: SessionManager<WallClock>,
    /// Per-session reply channels, registered and removed with the session
    outboxes: HashMap<SessionId, mpsc::UnboundedSender<String>>,
}

impl Shared {
    fn push(&self, id: SessionId, frame: String) {
        if let Some(tx) = self.outboxes.get(&id) {
            // A closed receiver means the connection is mid-teardown
            let _ = tx.send(frame);
        }
    }
}

/// Accept connections and serve sessions until the listener fails
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!(addr = %config.bind, "petling server listening");

    let shared = Arc::new(Mutex::new(Shared {
        manager: SessionManager::new(WallClock),
        outboxes: HashMap::new(),
    }));

    spawn_push_task(Arc::clone(&shared), config.push_interval_secs);

    loop {
        let (stream, peer) = listener.accept().await?;
        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, shared).await {
                warn!(%peer, error = %err, "connection ended with error");
            }
        });
    }
}

/// Periodic authoritative pushes: decay every live session and send the
/// snapshot unconditionally, even with no user action
fn spawn_push_task(shared: Arc<Mutex<Shared>>, period_secs: u64) {
    let period = Duration::from_secs(period_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // the first tick fires immediately
        loop {
            interval.tick().await;
            let mut shared = shared.lock().await;
            let pushes = shared.manager.tick_all();
            for (id, event) in pushes {
                shared.push(id, event.encode());
            }
        }
    });
}

async fn handle_connection(stream: TcpStream, shared: Arc<Mutex<Shared>>) -> Result<()> {
    let peer = stream.peer_addr()?;
    let (read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let id = {
        let mut shared = shared.lock().await;
        let id = shared.manager.connect();
        shared.outboxes.insert(id, tx);
        id
    };
    info!(session = %id, %peer, "session opened");

    // Writer task: drains the outbox until every sender is gone
    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if write_half.write_all(frame.as_bytes()).await.is_err() {
                break;
            }
            if write_half.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(session = %id, frame = line, "inbound");

        let mut shared = shared.lock().await;
        match shared.manager.handle_line(id, line) {
            Ok(outcome) => {
                for event in &outcome.events {
                    shared.push(id, event.encode());
                }
                if outcome.close {
                    break;
                }
            }
            // Torn down by a race; nothing to answer
            Err(Error::UnknownSession(_)) => break,
            Err(err) => {
                warn!(session = %id, error = %err, "dropping session");
                break;
            }
        }
    }

    // Outbox and session go together, atomically with respect to the push
    // task; dropping the sender lets the writer flush and finish
    {
        let mut shared = shared.lock().await;
        shared.outboxes.remove(&id);
        shared.manager.disconnect(id);
    }
    let _ = writer.await;
    info!(session = %id, "session closed");
    Ok(())
}
