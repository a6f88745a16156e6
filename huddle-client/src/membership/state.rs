use crate::errors::JoinError;
use crate::media::MediaStream;
use crate::membership::{AdmissionDecision, MembershipService};
use huddle_core::{ClientId, RoomId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Local join/ready state for one room visit. Owns the local capture
/// stream; once hung up it is never re-entered (a fresh join builds a
/// fresh instance).
pub struct RoomMembership {
    room_id: RoomId,
    client_id: ClientId,
    service: Arc<dyn MembershipService>,
    admitted: bool,
    ready: bool,
    local_stream: Option<Arc<dyn MediaStream>>,
}

impl RoomMembership {
    pub fn new(room_id: RoomId, client_id: ClientId, service: Arc<dyn MembershipService>) -> Self {
        Self {
            room_id,
            client_id,
            service,
            admitted: false,
            ready: false,
            local_stream: None,
        }
    }

    /// One capacity check against the store. A rejection is terminal for
    /// this attempt; the caller may retry with a fresh call.
    pub async fn request_admission(&mut self) -> Result<(), JoinError> {
        let decision = self
            .service
            .join(&self.room_id, &self.client_id)
            .await
            .map_err(JoinError::Membership)?;
        match decision {
            AdmissionDecision::Admitted => {
                self.admitted = true;
                Ok(())
            }
            AdmissionDecision::Rejected { reason } => {
                Err(JoinError::AdmissionRejected { reason })
            }
        }
    }

    pub fn attach_media(&mut self, stream: Arc<dyn MediaStream>) {
        self.local_stream = Some(stream);
    }

    pub fn local_stream(&self) -> Option<Arc<dyn MediaStream>> {
        self.local_stream.clone()
    }

    /// Idempotent. Only meaningful once admitted; earlier calls are
    /// dropped with a warning.
    pub fn mark_ready(&mut self) {
        if !self.admitted {
            warn!(room = %self.room_id, "mark_ready before admission ignored");
            return;
        }
        if self.ready {
            return;
        }
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_admitted(&self) -> bool {
        self.admitted
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Best-effort notification to the membership store; a failure is
    /// logged and never blocks local teardown.
    pub async fn release(&self) {
        if let Err(e) = self.service.leave(&self.room_id, &self.client_id).await {
            warn!(room = %self.room_id, "membership release failed: {e:#}");
        }
    }

    /// Stops local capture. Called once, after every session has been
    /// closed and dropped its track references.
    pub fn release_media(&mut self) {
        if let Some(stream) = self.local_stream.take() {
            debug!(room = %self.room_id, "stopping local media");
            stream.stop();
        }
    }
}
