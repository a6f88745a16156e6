use crate::model::ClientId;
use serde::{Deserialize, Serialize};

/// STUN/TURN relay hints handed to the media engine when a peer
/// connection is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn default_stun() -> Self {
        Self {
            urls: vec!["stun:stun.l.google.com:19302".to_owned()],
            username: None,
            credential: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid", skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex", skip_serializing_if = "Option::is_none")]
    pub sdp_mline_index: Option<u16>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_mline_index: None,
        }
    }
}

/// The wire unit exchanged over a room's broadcast topic. Every outbound
/// message carries the local id as `sender`; receivers drop anything whose
/// sender equals their own id (the relay echoes to everyone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    Join {
        sender: ClientId,
    },
    Ready {
        sender: ClientId,
    },
    Offer {
        sender: ClientId,
        target: ClientId,
        sdp: SessionDescription,
    },
    Answer {
        sender: ClientId,
        target: ClientId,
        sdp: SessionDescription,
    },
    Candidate {
        sender: ClientId,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<ClientId>,
        candidate: IceCandidate,
    },
    Leave {
        sender: ClientId,
    },
}

impl SignalMessage {
    pub fn sender(&self) -> &ClientId {
        match self {
            SignalMessage::Join { sender }
            | SignalMessage::Ready { sender }
            | SignalMessage::Offer { sender, .. }
            | SignalMessage::Answer { sender, .. }
            | SignalMessage::Candidate { sender, .. }
            | SignalMessage::Leave { sender } => sender,
        }
    }

    /// Addressee, when the message is directed at one participant.
    pub fn target(&self) -> Option<&ClientId> {
        match self {
            SignalMessage::Offer { target, .. } | SignalMessage::Answer { target, .. } => {
                Some(target)
            }
            SignalMessage::Candidate { target, .. } => target.as_ref(),
            SignalMessage::Join { .. }
            | SignalMessage::Ready { .. }
            | SignalMessage::Leave { .. } => None,
        }
    }
}
