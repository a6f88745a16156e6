use crate::media::MediaTrack;
use anyhow::Result;
use huddle_core::{ClientId, IceCandidate, IceServerConfig, SessionDescription};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events the media engine pushes back into the room loop. The engine
/// gets the sender at connection-creation time and fires these from its
/// own callbacks.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// A locally gathered candidate; transmitted to the remote at once,
    /// never buffered on this side.
    CandidateGenerated(ClientId, IceCandidate),
    /// Remote media arrived on this connection.
    TrackReceived(ClientId, MediaTrack),
    /// Fatal connectivity failure; the session is torn down.
    Failed(ClientId),
}

/// The opaque peer-connection object of the media engine. One per remote
/// participant, exclusively owned by that participant's session.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn add_track(&self, track: MediaTrack) -> Result<()>;
    async fn create_offer(&self) -> Result<SessionDescription>;
    async fn create_answer(&self) -> Result<SessionDescription>;
    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;
    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

pub trait PeerConnectionFactory: Send + Sync {
    fn create(
        &self,
        remote: ClientId,
        ice_servers: &[IceServerConfig],
        events: mpsc::Sender<ConnectionEvent>,
    ) -> Result<Arc<dyn PeerConnection>>;
}
