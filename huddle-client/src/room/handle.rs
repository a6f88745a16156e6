use crate::room::{RoomCommand, RoomEvent};
use crate::session::NegotiationState;
use huddle_core::ClientId;
use tokio::sync::{mpsc, oneshot};

/// Caller-facing handle to a joined room. Dropping it without calling
/// [`RoomHandle::hangup`] still tears the room down, just without
/// waiting for the teardown to finish.
pub struct RoomHandle {
    command_tx: mpsc::Sender<RoomCommand>,
    events_rx: mpsc::Receiver<RoomEvent>,
}

impl RoomHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<RoomCommand>,
        events_rx: mpsc::Receiver<RoomEvent>,
    ) -> Self {
        Self {
            command_tx,
            events_rx,
        }
    }

    /// Publishes Leave, closes every session, releases local media and
    /// the capacity slot. Resolves once teardown completed; safe to call
    /// while negotiations are still in flight.
    pub async fn hangup(&self) {
        let (done, wait) = oneshot::channel();
        if self
            .command_tx
            .send(RoomCommand::Hangup { done })
            .await
            .is_ok()
        {
            let _ = wait.await;
        }
    }

    /// Next application event; `None` once the room loop has exited.
    pub async fn next_event(&mut self) -> Option<RoomEvent> {
        self.events_rx.recv().await
    }

    pub async fn contains(&self, remote: &ClientId) -> bool {
        let (reply, rx) = oneshot::channel();
        let cmd = RoomCommand::Contains {
            remote: remote.clone(),
            reply,
        };
        if self.command_tx.send(cmd).await.is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    pub async fn session_states(&self) -> Vec<(ClientId, NegotiationState)> {
        let (reply, rx) = oneshot::channel();
        if self
            .command_tx
            .send(RoomCommand::Snapshot { reply })
            .await
            .is_err()
        {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }
}
