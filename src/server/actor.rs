//! Match actor - one tokio task per match
//!
//! The task owns the `Arena` outright. Transports talk to it through a
//! cloneable `MatchHandle`: requests go in over an mpsc inbox, snapshots
//! come out over a broadcast channel. The arena clock follows wall time,
//! advanced every tick period.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::arena::lifecycle::{JoinInfo, JoinOptions};
use crate::arena::{Arena, Command, MatchSnapshot};
use crate::core::config::MatchConfig;
use crate::core::error::{Result, RiftError};
use crate::core::types::PlayerId;
use crate::server::protocol::{ClientMessage, ServerMessage};

const INBOX_CAPACITY: usize = 64;
const UPDATES_CAPACITY: usize = 64;

enum Request {
    Join {
        options: JoinOptions,
        reply: oneshot::Sender<Result<JoinInfo>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<()>>,
    },
    Command {
        player_id: PlayerId,
        command: Command,
    },
    Snapshot {
        reply: oneshot::Sender<MatchSnapshot>,
    },
    Shutdown,
}

/// Cloneable handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    room_code: String,
    inbox: mpsc::Sender<Request>,
    updates: broadcast::Sender<ServerMessage>,
}

/// Start a match task on the current tokio runtime
pub fn spawn_match(config: MatchConfig) -> Result<MatchHandle> {
    let arena = Arena::new(config)?;
    let room_code = arena.room_code().to_string();
    let (inbox, requests) = mpsc::channel(INBOX_CAPACITY);
    let (updates, _) = broadcast::channel(UPDATES_CAPACITY);

    info!(room = %room_code, "match created");
    tokio::spawn(run_match(arena, requests, updates.clone()));

    Ok(MatchHandle {
        room_code,
        inbox,
        updates,
    })
}

impl MatchHandle {
    pub fn room_code(&self) -> &str {
        &self.room_code
    }

    /// Receive every snapshot broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.updates.subscribe()
    }

    pub async fn join(&self, options: JoinOptions) -> Result<JoinInfo> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Join { options, reply }).await?;
        rx.await.map_err(|_| RiftError::ActorClosed)?
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Leave { player_id, reply }).await?;
        rx.await.map_err(|_| RiftError::ActorClosed)?
    }

    /// Queue a command. Rejections are silent by protocol.
    pub async fn send(&self, player_id: PlayerId, command: Command) -> Result<()> {
        self.request(Request::Command { player_id, command }).await
    }

    /// Queue a raw JSON client message
    pub async fn send_text(&self, player_id: PlayerId, text: &str) -> Result<()> {
        let message = ClientMessage::parse(text)?;
        self.send(player_id, message.into()).await
    }

    pub async fn snapshot(&self) -> Result<MatchSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.request(Request::Snapshot { reply }).await?;
        rx.await.map_err(|_| RiftError::ActorClosed)
    }

    pub async fn shutdown(&self) {
        let _ = self.inbox.send(Request::Shutdown).await;
    }

    async fn request(&self, request: Request) -> Result<()> {
        self.inbox
            .send(request)
            .await
            .map_err(|_| RiftError::ActorClosed)
    }
}

async fn run_match(
    mut arena: Arena,
    mut requests: mpsc::Receiver<Request>,
    updates: broadcast::Sender<ServerMessage>,
) {
    let started = Instant::now();
    let mut ticker = interval(arena.config().tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let force_broadcast = tokio::select! {
            request = requests.recv() => match request {
                None | Some(Request::Shutdown) => break,
                Some(request) => handle_request(&mut arena, request),
            },
            _ = ticker.tick() => {
                let target_ms = started.elapsed().as_millis() as u64;
                let behind = target_ms.saturating_sub(arena.now_ms());
                arena.advance(Duration::from_millis(behind));
                false
            }
        };
        flush(&mut arena, &updates, force_broadcast);
    }

    info!(room = %arena.room_code(), phase = ?arena.phase(), "match closed");
}

/// Apply one request; true if the state changed and clients need a snapshot
fn handle_request(arena: &mut Arena, request: Request) -> bool {
    match request {
        Request::Join { options, reply } => {
            let result = arena.join(options);
            let joined = result.is_ok();
            let _ = reply.send(result);
            joined
        }
        Request::Leave { player_id, reply } => {
            let result = arena.leave(player_id);
            let left = result.is_ok();
            let _ = reply.send(result);
            left
        }
        Request::Command { player_id, command } => {
            arena.handle_command(player_id, command).is_ok()
        }
        Request::Snapshot { reply } => {
            let _ = reply.send(arena.snapshot());
            false
        }
        Request::Shutdown => false,
    }
}

fn flush(arena: &mut Arena, updates: &broadcast::Sender<ServerMessage>, force: bool) {
    let log = arena.drain_events();
    for event in &log.events {
        trace!(room = %arena.room_code(), ?event, "arena event");
    }
    if force || log.requests_broadcast() {
        // No subscribers is not an error; a transport may attach later
        if updates.send(ServerMessage::state(arena.snapshot())).is_err() {
            debug!(room = %arena.room_code(), "snapshot dropped, no subscribers");
        }
    }
}
