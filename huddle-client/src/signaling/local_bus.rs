use crate::signaling::{BusEvent, SignalBus};
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::SignalMessage;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

const TOPIC_CAPACITY: usize = 64;

/// In-process signal bus: one broadcast channel per topic. Every
/// subscriber of a topic sees every message published to it, the
/// publisher included, matching the relay's fan-out contract (echo
/// suppression stays the receiver's job). Used by tests and by
/// single-process wiring.
#[derive(Default)]
pub struct LocalSignalBus {
    topics: DashMap<String, broadcast::Sender<SignalMessage>>,
}

impl LocalSignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender_for(&self, topic: &str) -> broadcast::Sender<SignalMessage> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl SignalBus for LocalSignalBus {
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<BusEvent>> {
        let mut rx = self.sender_for(topic).subscribe();
        let (tx, out) = mpsc::channel(TOPIC_CAPACITY);
        let topic = topic.to_string();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if tx.send(BusEvent::Message(msg)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(topic = %topic, skipped = n, "slow subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Ok(out)
    }

    async fn publish(&self, destination: &str, message: &SignalMessage) -> Result<()> {
        // `room.<id>.send` and `room.<id>` are the same channel in-process.
        let topic = destination.strip_suffix(".send").unwrap_or(destination);
        // No subscribers yet is fine; the message is simply unheard.
        let _ = self.sender_for(topic).send(message.clone());
        Ok(())
    }
}
