mod client;
mod room;
mod signaling;

pub use client::ClientId;
pub use room::RoomId;
pub use signaling::{IceCandidate, IceServerConfig, SdpKind, SessionDescription, SignalMessage};
