use crate::errors::MediaError;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Opaque handle to one capture track. Only the media engine behind
/// [`PeerConnection`](crate::PeerConnection) knows what the id resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: String,
    pub kind: TrackKind,
}

/// A live local capture stream. Every session attaches its tracks
/// read-only; the stream is stopped exactly once, at teardown, after all
/// sessions have been closed.
pub trait MediaStream: Send + Sync {
    fn tracks(&self) -> Vec<MediaTrack>;
    fn stop(&self);
}

/// Camera/microphone acquisition (the browser `getUserMedia` seam).
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Arc<dyn MediaStream>, MediaError>;
}
