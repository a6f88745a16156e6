use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque room id: names both the signaling topic and the capacity-check
/// key on the membership service.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Broadcast topic every participant of the room subscribes to.
    pub fn topic(&self) -> String {
        format!("room.{}", self.0)
    }

    /// Destination all participants publish their signals to.
    pub fn send_destination(&self) -> String {
        format!("room.{}.send", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
