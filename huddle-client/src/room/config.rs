use crate::media::MediaConstraints;
use huddle_core::IceServerConfig;

/// Per-room client configuration.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub media: MediaConstraints,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::default_stun()],
            media: MediaConstraints::default(),
        }
    }
}
