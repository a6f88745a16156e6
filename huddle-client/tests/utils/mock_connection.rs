use anyhow::{Result, anyhow};
use async_trait::async_trait;
use huddle_client::{ConnectionEvent, MediaTrack, PeerConnection, PeerConnectionFactory};
use huddle_core::{ClientId, IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Everything a mock connection was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnOp {
    AddTrack(String),
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpKind),
    SetRemote(SdpKind),
    AddCandidate(String),
    Close,
}

pub struct MockConnection {
    remote: ClientId,
    ops: Mutex<Vec<ConnOp>>,
    events: mpsc::Sender<ConnectionEvent>,
    fail_negotiation: Arc<AtomicBool>,
    fail_candidates: Arc<AtomicBool>,
}

impl MockConnection {
    pub fn remote(&self) -> &ClientId {
        &self.remote
    }

    pub fn ops(&self) -> Vec<ConnOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, ConnOp::Close))
            .count()
    }

    pub fn applied_candidates(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ConnOp::AddCandidate(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Drive an engine-side event into the room loop, as the real media
    /// engine would from its callbacks.
    pub async fn emit(&self, event: ConnectionEvent) {
        let _ = self.events.send(event).await;
    }

    fn record(&self, op: ConnOp) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl PeerConnection for MockConnection {
    async fn add_track(&self, track: MediaTrack) -> Result<()> {
        self.record(ConnOp::AddTrack(track.id));
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        if self.fail_negotiation.load(Ordering::SeqCst) {
            return Err(anyhow!("engine refused to create offer"));
        }
        self.record(ConnOp::CreateOffer);
        Ok(SessionDescription::offer(format!(
            "v=0 offer-for-{}",
            self.remote
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        if self.fail_negotiation.load(Ordering::SeqCst) {
            return Err(anyhow!("engine refused to create answer"));
        }
        self.record(ConnOp::CreateAnswer);
        Ok(SessionDescription::answer(format!(
            "v=0 answer-for-{}",
            self.remote
        )))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.record(ConnOp::SetLocal(desc.kind));
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        if self.fail_negotiation.load(Ordering::SeqCst) {
            return Err(anyhow!("engine refused the remote description"));
        }
        self.record(ConnOp::SetRemote(desc.kind));
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        if self.fail_candidates.load(Ordering::SeqCst) {
            return Err(anyhow!("malformed candidate"));
        }
        self.record(ConnOp::AddCandidate(candidate.candidate));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.record(ConnOp::Close);
        Ok(())
    }
}

/// Factory that records every connection it hands out, so tests can
/// inspect per-remote call sequences afterwards.
#[derive(Clone)]
pub struct MockConnectionFactory {
    connections: Arc<Mutex<Vec<Arc<MockConnection>>>>,
    fail_negotiation: Arc<AtomicBool>,
    fail_candidates: Arc<AtomicBool>,
}

impl MockConnectionFactory {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(Vec::new())),
            fail_negotiation: Arc::new(AtomicBool::new(false)),
            fail_candidates: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes description generation/application fail on every connection
    /// from this factory.
    pub fn fail_negotiation(&self) {
        self.fail_negotiation.store(true, Ordering::SeqCst);
    }

    pub fn fail_candidates(&self) {
        self.fail_candidates.store(true, Ordering::SeqCst);
    }

    pub fn created(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    pub fn connection_for(&self, remote: &ClientId) -> Option<Arc<MockConnection>> {
        self.connections
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.remote() == remote)
            .cloned()
    }
}

impl Default for MockConnectionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerConnectionFactory for MockConnectionFactory {
    fn create(
        &self,
        remote: ClientId,
        _ice_servers: &[IceServerConfig],
        events: mpsc::Sender<ConnectionEvent>,
    ) -> Result<Arc<dyn PeerConnection>> {
        let conn = Arc::new(MockConnection {
            remote,
            ops: Mutex::new(Vec::new()),
            events,
            fail_negotiation: self.fail_negotiation.clone(),
            fail_candidates: self.fail_candidates.clone(),
        });
        self.connections.lock().unwrap().push(conn.clone());
        Ok(conn)
    }
}
