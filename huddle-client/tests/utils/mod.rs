#![allow(dead_code)]

pub mod mock_connection;
pub mod mock_media;

pub use mock_connection::*;
pub use mock_media::*;

use huddle_client::{
    BusEvent, InMemoryMembership, LocalSignalBus, NegotiationState, RoomConfig, RoomCoordinator,
    RoomDeps, RoomHandle, SignalBus,
};
use huddle_core::{ClientId, RoomId, SignalMessage};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::Level;

pub const WAIT_TIMEOUT_MS: u64 = 2000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// One client wired up with mock media engine and capture source.
pub struct TestParticipant {
    pub id: ClientId,
    pub factory: MockConnectionFactory,
    pub media: Arc<MockMediaSource>,
    pub handle: RoomHandle,
}

pub async fn join_participant(
    bus: &Arc<LocalSignalBus>,
    membership: &Arc<InMemoryMembership>,
    room: &RoomId,
    id: &str,
) -> Result<TestParticipant, huddle_client::JoinError> {
    let factory = MockConnectionFactory::new();
    let media = Arc::new(MockMediaSource::granted());
    let deps = RoomDeps {
        bus: bus.clone(),
        factory: Arc::new(factory.clone()),
        media: media.clone(),
        membership: membership.clone(),
    };
    let handle = RoomCoordinator::join(
        deps,
        room.clone(),
        ClientId::from(id),
        RoomConfig::default(),
    )
    .await?;
    Ok(TestParticipant {
        id: ClientId::from(id),
        factory,
        media,
        handle,
    })
}

/// Raw tap on the room's broadcast topic, for asserting what actually
/// went over the wire.
pub async fn tap_room(bus: &Arc<LocalSignalBus>, room: &RoomId) -> mpsc::Receiver<BusEvent> {
    bus.subscribe(&room.topic()).await.expect("tap subscribe")
}

/// Drain the tap for a quiet period and return everything seen.
pub async fn collect_signals(
    rx: &mut mpsc::Receiver<BusEvent>,
    quiet_ms: u64,
) -> Vec<SignalMessage> {
    let mut seen = Vec::new();
    loop {
        match tokio::time::timeout(Duration::from_millis(quiet_ms), rx.recv()).await {
            Ok(Some(BusEvent::Message(msg))) => seen.push(msg),
            Ok(Some(BusEvent::Reconnected)) => continue,
            Ok(None) | Err(_) => return seen,
        }
    }
}

/// Publish a hand-crafted message into the room, impersonating a peer
/// that is not driven by a coordinator.
pub async fn publish_raw(bus: &Arc<LocalSignalBus>, room: &RoomId, msg: SignalMessage) {
    bus.publish(&room.send_destination(), &msg)
        .await
        .expect("raw publish");
}

/// Poll until the session for `remote` reaches `want` or the timeout.
pub async fn wait_for_state(
    handle: &RoomHandle,
    remote: &ClientId,
    want: NegotiationState,
    timeout_ms: u64,
) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        let states = handle.session_states().await;
        if states.iter().any(|(id, s)| id == remote && *s == want) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Poll until the registry no longer knows `remote`, or the timeout.
pub async fn wait_for_absent(handle: &RoomHandle, remote: &ClientId, timeout_ms: u64) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if !handle.contains(remote).await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
