use crate::media::MediaTrack;
use huddle_core::ClientId;

/// Application-facing notifications from the room loop (the hooks a UI
/// binds remote video and roster updates to). Delivery is best-effort: a
/// consumer that stops draining loses events rather than stalling the
/// loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    PeerJoined(ClientId),
    PeerLeft(ClientId),
    RemoteTrack { from: ClientId, track: MediaTrack },
    SessionFailed(ClientId),
}
