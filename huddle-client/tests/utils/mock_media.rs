use async_trait::async_trait;
use huddle_client::{MediaConstraints, MediaError, MediaSource, MediaStream, MediaTrack, TrackKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fake capture stream: two tracks, counts how often it was stopped.
pub struct MockMediaStream {
    stops: AtomicUsize,
}

impl MockMediaStream {
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl MediaStream for MockMediaStream {
    fn tracks(&self) -> Vec<MediaTrack> {
        vec![
            MediaTrack {
                id: "mic-0".to_string(),
                kind: TrackKind::Audio,
            },
            MediaTrack {
                id: "cam-0".to_string(),
                kind: TrackKind::Video,
            },
        ]
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockMediaSource {
    stream: Arc<MockMediaStream>,
    deny: bool,
}

impl MockMediaSource {
    pub fn granted() -> Self {
        Self {
            stream: Arc::new(MockMediaStream {
                stops: AtomicUsize::new(0),
            }),
            deny: false,
        }
    }

    /// Simulates the user denying the camera/microphone prompt.
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::granted()
        }
    }

    pub fn stream(&self) -> Arc<MockMediaStream> {
        self.stream.clone()
    }
}

#[async_trait]
impl MediaSource for MockMediaSource {
    async fn acquire(
        &self,
        _constraints: MediaConstraints,
    ) -> Result<Arc<dyn MediaStream>, MediaError> {
        if self.deny {
            return Err(MediaError::PermissionDenied);
        }
        Ok(self.stream.clone())
    }
}
