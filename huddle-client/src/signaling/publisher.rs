use crate::signaling::{SignalBus, SignalingOutput};
use async_trait::async_trait;
use huddle_core::{ClientId, IceCandidate, RoomId, SessionDescription, SignalMessage};
use std::sync::Arc;
use tracing::error;

/// Stamps the local sender id on every outbound message and publishes it
/// to the room's send destination.
pub struct BusPublisher {
    bus: Arc<dyn SignalBus>,
    room_id: RoomId,
    local_id: ClientId,
}

impl BusPublisher {
    pub fn new(bus: Arc<dyn SignalBus>, room_id: RoomId, local_id: ClientId) -> Self {
        Self {
            bus,
            room_id,
            local_id,
        }
    }

    async fn publish(&self, message: SignalMessage) {
        let destination = self.room_id.send_destination();
        if let Err(e) = self.bus.publish(&destination, &message).await {
            error!(room = %self.room_id, "failed to publish signal: {e:#}");
        }
    }

    pub async fn announce_join(&self) {
        self.publish(SignalMessage::Join {
            sender: self.local_id.clone(),
        })
        .await;
    }

    pub async fn announce_ready(&self) {
        self.publish(SignalMessage::Ready {
            sender: self.local_id.clone(),
        })
        .await;
    }

    pub async fn announce_leave(&self) {
        self.publish(SignalMessage::Leave {
            sender: self.local_id.clone(),
        })
        .await;
    }
}

#[async_trait]
impl SignalingOutput for BusPublisher {
    async fn send_offer(&self, to: ClientId, sdp: SessionDescription) {
        self.publish(SignalMessage::Offer {
            sender: self.local_id.clone(),
            target: to,
            sdp,
        })
        .await;
    }

    async fn send_answer(&self, to: ClientId, sdp: SessionDescription) {
        self.publish(SignalMessage::Answer {
            sender: self.local_id.clone(),
            target: to,
            sdp,
        })
        .await;
    }

    async fn send_candidate(&self, to: ClientId, candidate: IceCandidate) {
        self.publish(SignalMessage::Candidate {
            sender: self.local_id.clone(),
            target: Some(to),
            candidate,
        })
        .await;
    }
}
