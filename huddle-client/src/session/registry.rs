use crate::session::{NegotiationState, PeerSession, SessionCommand, SessionContext};
use huddle_core::ClientId;
use std::collections::HashMap;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

const MAILBOX_CAPACITY: usize = 64;

/// Handle to one running session task.
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<NegotiationState>,
    is_offerer: bool,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Late commands for a session whose task already exited are no-ops
    /// by contract, so a closed mailbox is not an error.
    pub async fn send(&self, cmd: SessionCommand) {
        let _ = self.tx.send(cmd).await;
    }

    pub fn state(&self) -> NegotiationState {
        *self.state.borrow()
    }

    pub fn is_offerer(&self) -> bool {
        self.is_offerer
    }
}

/// remoteId -> session map for the local room membership. Only the room
/// loop touches it, which is what makes `get_or_create` race-free against
/// concurrent inbound messages for the same remote.
pub struct PeerSessionRegistry {
    ctx: SessionContext,
    sessions: HashMap<ClientId, SessionHandle>,
}

impl PeerSessionRegistry {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            sessions: HashMap::new(),
        }
    }

    pub fn get(&self, remote: &ClientId) -> Option<&SessionHandle> {
        self.sessions.get(remote)
    }

    pub fn contains(&self, remote: &ClientId) -> bool {
        self.sessions.contains_key(remote)
    }

    /// At most one session per remote; the offerer role is fixed here, at
    /// creation time, and never changes for the session's lifetime.
    pub fn get_or_create(&mut self, remote: &ClientId) -> &SessionHandle {
        let ctx = self.ctx.clone();
        self.sessions
            .entry(remote.clone())
            .or_insert_with(|| Self::spawn(ctx, remote.clone()))
    }

    fn spawn(ctx: SessionContext, remote: ClientId) -> SessionHandle {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let (state_tx, state_rx) = watch::channel(NegotiationState::Idle);
        let session = PeerSession::new(ctx, remote.clone(), state_tx);
        let is_offerer = session.is_offerer();
        debug!(remote = %remote, offerer = is_offerer, "spawning peer session");
        let task = tokio::spawn(session.run(rx));
        SessionHandle {
            tx,
            state: state_rx,
            is_offerer,
            task,
        }
    }

    /// Closes the session and forgets it; `get` reports absent afterwards.
    /// Returns whether a session existed.
    pub async fn remove(&mut self, remote: &ClientId) -> bool {
        let Some(handle) = self.sessions.remove(remote) else {
            return false;
        };
        handle.send(SessionCommand::Close).await;
        true
    }

    /// Hangup path: close every session and wait for the tasks to finish,
    /// so local media can be stopped after all of them released their
    /// track references.
    pub async fn close_all(&mut self) {
        for (_, handle) in self.sessions.drain() {
            handle.send(SessionCommand::Close).await;
            let _ = handle.task.await;
        }
    }

    pub fn states(&self) -> Vec<(ClientId, NegotiationState)> {
        self.sessions
            .iter()
            .map(|(id, handle)| (id.clone(), handle.state()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
