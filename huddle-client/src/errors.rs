use huddle_core::ClientId;
use thiserror::Error;

/// Failures surfaced synchronously to the caller of
/// [`crate::RoomCoordinator::join`]. Nothing has been published to the
/// bus when one of these comes back.
#[derive(Debug, Error)]
pub enum JoinError {
    /// Room at capacity. Retrying later is up to the caller; there is no
    /// automatic retry.
    #[error("admission rejected: {reason}")]
    AdmissionRejected { reason: String },

    /// Local camera/microphone unavailable or denied.
    #[error("media acquisition failed: {0}")]
    MediaAcquisitionFailed(#[from] MediaError),

    /// The signaling bus refused the subscription.
    #[error("signal bus error: {0}")]
    Bus(#[source] anyhow::Error),

    /// The membership service could not be reached at all.
    #[error("membership service error: {0}")]
    Membership(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Per-session failures. These never reach the room-level caller: they
/// close the one affected session and are observable through logs and
/// [`crate::RoomEvent::SessionFailed`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("negotiation with {remote} failed: {source}")]
    NegotiationFailed {
        remote: ClientId,
        #[source]
        source: anyhow::Error,
    },

    #[error("candidate apply for {remote} failed: {source}")]
    CandidateApplyFailed {
        remote: ClientId,
        #[source]
        source: anyhow::Error,
    },
}
