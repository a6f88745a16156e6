use anyhow::Result;
use async_trait::async_trait;
use huddle_core::SignalMessage;
use tokio::sync::mpsc;

/// One inbound item from the bus adapter.
#[derive(Debug, Clone)]
pub enum BusEvent {
    Message(SignalMessage),
    /// The underlying socket dropped and the adapter re-established it
    /// (the subscription included). Peer connections survive a signaling
    /// outage; the coordinator re-announces itself so negotiation with
    /// newcomers can resume.
    Reconnected,
}

/// Publish/subscribe signaling transport. Wire framing and socket-level
/// reconnection live entirely behind this seam.
#[async_trait]
pub trait SignalBus: Send + Sync {
    /// Messages for `topic`, in transport delivery order. Dropping the
    /// receiver ends the subscription.
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<BusEvent>>;

    async fn publish(&self, destination: &str, message: &SignalMessage) -> Result<()>;
}
