use async_trait::async_trait;
use huddle_core::{ClientId, IceCandidate, SessionDescription};

/// Outbound signal sink handed to peer sessions, so the negotiation state
/// machine never touches the bus or the wire format directly. Send
/// failures are logged by the implementation, not propagated; losing a
/// signal surfaces later as a stalled negotiation.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_offer(&self, to: ClientId, sdp: SessionDescription);

    async fn send_answer(&self, to: ClientId, sdp: SessionDescription);

    async fn send_candidate(&self, to: ClientId, candidate: IceCandidate);
}
