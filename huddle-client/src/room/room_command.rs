use crate::session::NegotiationState;
use huddle_core::ClientId;
use tokio::sync::oneshot;

/// Local commands into the room loop, sent through [`crate::RoomHandle`].
#[derive(Debug)]
pub enum RoomCommand {
    /// Publish Leave, close every session, release media and the
    /// capacity slot. Acknowledged once teardown finished.
    Hangup { done: oneshot::Sender<()> },

    /// Introspection: does a session for this remote exist right now?
    Contains {
        remote: ClientId,
        reply: oneshot::Sender<bool>,
    },

    /// Introspection: negotiation state per known remote.
    Snapshot {
        reply: oneshot::Sender<Vec<(ClientId, NegotiationState)>>,
    },
}
