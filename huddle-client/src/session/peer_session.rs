use crate::errors::SessionError;
use crate::media::{ConnectionEvent, MediaStream, PeerConnection, PeerConnectionFactory};
use crate::session::SessionCommand;
use crate::signaling::SignalingOutput;
use anyhow::{Context, Result};
use huddle_core::{ClientId, IceCandidate, IceServerConfig, SessionDescription};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Offering,
    Answering,
    Connected,
    Closed,
}

/// Shared collaborators handed to every session the registry spawns.
#[derive(Clone)]
pub struct SessionContext {
    pub local_id: ClientId,
    pub factory: Arc<dyn PeerConnectionFactory>,
    pub ice_servers: Vec<IceServerConfig>,
    pub local_stream: Option<Arc<dyn MediaStream>>,
    pub signaling: Arc<dyn SignalingOutput>,
    pub conn_events: mpsc::Sender<ConnectionEvent>,
}

/// Negotiation state machine for one remote participant. Owns the peer
/// connection object and the buffer of candidates that arrived before the
/// remote description. Runs as its own task, fed through a FIFO mailbox.
pub struct PeerSession {
    ctx: SessionContext,
    remote_id: ClientId,
    state: NegotiationState,
    is_offerer: bool,
    connection: Option<Arc<dyn PeerConnection>>,
    remote_description_set: bool,
    pending_candidates: Vec<IceCandidate>,
    state_tx: watch::Sender<NegotiationState>,
}

impl PeerSession {
    pub fn new(
        ctx: SessionContext,
        remote_id: ClientId,
        state_tx: watch::Sender<NegotiationState>,
    ) -> Self {
        let is_offerer = Self::offerer_between(&ctx.local_id, &remote_id);
        Self {
            ctx,
            remote_id,
            state: NegotiationState::Idle,
            is_offerer,
            connection: None,
            remote_description_set: false,
            pending_candidates: Vec::new(),
            state_tx,
        }
    }

    /// The glare tie-break: the lexicographically smaller id offers.
    /// Both ends compute the same role from the same pair of ids.
    pub fn offerer_between(local: &ClientId, remote: &ClientId) -> bool {
        local < remote
    }

    pub fn is_offerer(&self) -> bool {
        self.is_offerer
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd).await;
            if self.state == NegotiationState::Closed {
                break;
            }
        }
        // Mailbox dropped by the registry, explicit Close, or a fatal
        // failure; release the connection either way.
        self.close().await;
        debug!(remote = %self.remote_id, "session task finished");
    }

    async fn handle(&mut self, cmd: SessionCommand) {
        let result = match cmd {
            SessionCommand::StartOffer => self.start_offer().await,
            SessionCommand::RemoteOffer(sdp) => self.accept_offer(sdp).await,
            SessionCommand::RemoteAnswer(sdp) => self.apply_answer(sdp).await,
            SessionCommand::RemoteCandidate(candidate) => {
                self.add_remote_candidate(candidate).await;
                Ok(())
            }
            SessionCommand::Close => {
                self.close().await;
                Ok(())
            }
        };
        if let Err(source) = result {
            let err = SessionError::NegotiationFailed {
                remote: self.remote_id.clone(),
                source,
            };
            warn!("{err:#}");
            self.close().await;
            // Let the room loop forget this session. Dropped when the
            // loop is already tearing down, which is fine.
            let _ = self
                .ctx
                .conn_events
                .try_send(ConnectionEvent::Failed(self.remote_id.clone()));
        }
    }

    async fn start_offer(&mut self) -> Result<()> {
        if self.state != NegotiationState::Idle || !self.is_offerer {
            // Re-broadcast Ready messages retrigger StartOffer; only the
            // first one acts.
            return Ok(());
        }
        let conn = self.ensure_connection().await?;
        self.set_state(NegotiationState::Offering);
        let offer = conn.create_offer().await.context("create offer")?;
        conn.set_local_description(offer.clone())
            .await
            .context("set local offer")?;
        self.ctx
            .signaling
            .send_offer(self.remote_id.clone(), offer)
            .await;
        Ok(())
    }

    async fn accept_offer(&mut self, sdp: SessionDescription) -> Result<()> {
        if self.state != NegotiationState::Idle {
            debug!(remote = %self.remote_id, state = ?self.state, "ignoring stray offer");
            return Ok(());
        }
        let conn = self.ensure_connection().await?;
        self.set_state(NegotiationState::Answering);
        conn.set_remote_description(sdp)
            .await
            .context("set remote offer")?;
        self.remote_description_set = true;
        self.flush_pending_candidates().await;
        let answer = conn.create_answer().await.context("create answer")?;
        conn.set_local_description(answer.clone())
            .await
            .context("set local answer")?;
        self.ctx
            .signaling
            .send_answer(self.remote_id.clone(), answer)
            .await;
        // Usable as soon as the answer is out; connectivity keeps going
        // asynchronously through candidate exchange.
        self.set_state(NegotiationState::Connected);
        Ok(())
    }

    async fn apply_answer(&mut self, sdp: SessionDescription) -> Result<()> {
        if self.state != NegotiationState::Offering {
            debug!(remote = %self.remote_id, state = ?self.state, "ignoring stray answer");
            return Ok(());
        }
        let conn = self
            .connection
            .clone()
            .context("answer without a connection")?;
        conn.set_remote_description(sdp)
            .await
            .context("set remote answer")?;
        self.remote_description_set = true;
        self.flush_pending_candidates().await;
        self.set_state(NegotiationState::Connected);
        Ok(())
    }

    /// Candidates arriving before the remote description are buffered and
    /// flushed in arrival order the instant it is set.
    async fn add_remote_candidate(&mut self, candidate: IceCandidate) {
        if !self.remote_description_set {
            self.pending_candidates.push(candidate);
            return;
        }
        self.apply_candidate(candidate).await;
    }

    async fn apply_candidate(&mut self, candidate: IceCandidate) {
        let Some(conn) = self.connection.clone() else {
            return;
        };
        if let Err(source) = conn.add_ice_candidate(candidate).await {
            // A single bad or late candidate never tears the session down.
            let err = SessionError::CandidateApplyFailed {
                remote: self.remote_id.clone(),
                source,
            };
            warn!("{err:#}");
        }
    }

    async fn flush_pending_candidates(&mut self) {
        if self.pending_candidates.is_empty() {
            return;
        }
        debug!(
            remote = %self.remote_id,
            count = self.pending_candidates.len(),
            "flushing buffered candidates"
        );
        for candidate in std::mem::take(&mut self.pending_candidates) {
            self.apply_candidate(candidate).await;
        }
    }

    async fn ensure_connection(&mut self) -> Result<Arc<dyn PeerConnection>> {
        if let Some(conn) = &self.connection {
            return Ok(conn.clone());
        }
        let conn = self
            .ctx
            .factory
            .create(
                self.remote_id.clone(),
                &self.ctx.ice_servers,
                self.ctx.conn_events.clone(),
            )
            .context("create peer connection")?;
        if let Some(stream) = &self.ctx.local_stream {
            for track in stream.tracks() {
                conn.add_track(track).await.context("attach local track")?;
            }
        }
        self.connection = Some(conn.clone());
        Ok(conn)
    }

    /// Terminal. Releases the connection exactly once and drops any
    /// buffered candidates; everything arriving afterwards is a no-op.
    async fn close(&mut self) {
        self.set_state(NegotiationState::Closed);
        self.pending_candidates.clear();
        if let Some(conn) = self.connection.take() {
            if let Err(e) = conn.close().await {
                warn!(remote = %self.remote_id, "error closing connection: {e:#}");
            }
        }
    }

    fn set_state(&mut self, next: NegotiationState) {
        if self.state == next {
            return;
        }
        debug!(remote = %self.remote_id, from = ?self.state, to = ?next, "session state");
        self.state = next;
        let _ = self.state_tx.send(next);
    }
}
