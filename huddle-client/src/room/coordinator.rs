use crate::errors::JoinError;
use crate::media::{ConnectionEvent, MediaSource, PeerConnectionFactory};
use crate::membership::{MembershipService, RoomMembership};
use crate::room::{RoomCommand, RoomConfig, RoomEvent, RoomHandle};
use crate::session::{PeerSessionRegistry, SessionCommand, SessionContext};
use crate::signaling::{BusEvent, BusPublisher, SignalBus, SignalingOutput};
use huddle_core::{ClientId, RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const COMMAND_CAPACITY: usize = 16;
const EVENT_CAPACITY: usize = 256;

/// Everything the coordinator borrows from the outside world.
pub struct RoomDeps {
    pub bus: Arc<dyn SignalBus>,
    pub factory: Arc<dyn PeerConnectionFactory>,
    pub media: Arc<dyn MediaSource>,
    pub membership: Arc<dyn MembershipService>,
}

/// Top-level signaling coordinator for one room membership. All inbound
/// signals for the room funnel through its single event loop; per-peer
/// negotiation runs in the session tasks it spawns through the registry.
pub struct RoomCoordinator {
    local_id: ClientId,
    membership: RoomMembership,
    registry: PeerSessionRegistry,
    publisher: Arc<BusPublisher>,
    command_rx: mpsc::Receiver<RoomCommand>,
    bus_rx: mpsc::Receiver<BusEvent>,
    conn_events_rx: mpsc::Receiver<ConnectionEvent>,
    events_tx: mpsc::Sender<RoomEvent>,
}

impl RoomCoordinator {
    /// Joins a room: acquires local media, requests capacity admission,
    /// subscribes to the room topic and announces Join then Ready. On any
    /// error nothing has been published and no session exists; a rejected
    /// attempt may be retried with a fresh call.
    pub async fn join(
        deps: RoomDeps,
        room_id: RoomId,
        client_id: ClientId,
        config: RoomConfig,
    ) -> Result<RoomHandle, JoinError> {
        let stream = deps.media.acquire(config.media).await?;

        let mut membership =
            RoomMembership::new(room_id.clone(), client_id.clone(), deps.membership.clone());
        if let Err(e) = membership.request_admission().await {
            // Do not keep the camera on for a join that failed.
            stream.stop();
            return Err(e);
        }
        membership.attach_media(stream);

        let bus_rx = deps
            .bus
            .subscribe(&room_id.topic())
            .await
            .map_err(JoinError::Bus)?;

        let publisher = Arc::new(BusPublisher::new(
            deps.bus.clone(),
            room_id.clone(),
            client_id.clone(),
        ));
        publisher.announce_join().await;
        membership.mark_ready();
        publisher.announce_ready().await;
        info!(room = %room_id, client = %client_id, "joined room and announced ready");

        let (conn_events_tx, conn_events_rx) = mpsc::channel(EVENT_CAPACITY);
        let ctx = SessionContext {
            local_id: client_id.clone(),
            factory: deps.factory,
            ice_servers: config.ice_servers,
            local_stream: membership.local_stream(),
            signaling: publisher.clone(),
            conn_events: conn_events_tx,
        };

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);

        let coordinator = Self {
            local_id: client_id,
            membership,
            registry: PeerSessionRegistry::new(ctx),
            publisher,
            command_rx,
            bus_rx,
            conn_events_rx,
            events_tx,
        };
        tokio::spawn(coordinator.run());

        Ok(RoomHandle::new(command_tx, events_rx))
    }

    async fn run(mut self) {
        debug!(client = %self.local_id, "room loop started");
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(RoomCommand::Hangup { done }) => {
                            self.hangup().await;
                            let _ = done.send(());
                            break;
                        }
                        Some(RoomCommand::Contains { remote, reply }) => {
                            let _ = reply.send(self.registry.contains(&remote));
                        }
                        Some(RoomCommand::Snapshot { reply }) => {
                            let _ = reply.send(self.registry.states());
                        }
                        None => {
                            // Handle dropped without an explicit hangup.
                            self.hangup().await;
                            break;
                        }
                    }
                }
                evt = self.bus_rx.recv() => {
                    match evt {
                        Some(BusEvent::Message(msg)) => self.handle_inbound(msg).await,
                        Some(BusEvent::Reconnected) => self.handle_reconnect().await,
                        None => {
                            warn!(client = %self.local_id, "signal bus closed, shutting room down");
                            self.hangup().await;
                            break;
                        }
                    }
                }
                Some(evt) = self.conn_events_rx.recv() => {
                    self.handle_connection_event(evt).await;
                }
            }
        }
        debug!(client = %self.local_id, "room loop finished");
    }

    /// Message-routing entry point. Echo suppression first, then the
    /// addressee check, then dispatch by type.
    async fn handle_inbound(&mut self, msg: SignalMessage) {
        if msg.sender() == &self.local_id {
            return;
        }
        if let Some(target) = msg.target()
            && target != &self.local_id
        {
            // Someone else's leg of the mesh on the shared topic.
            return;
        }
        match msg {
            SignalMessage::Join { sender } => self.handle_join(sender).await,
            SignalMessage::Ready { sender } => self.handle_ready(sender).await,
            SignalMessage::Offer { sender, sdp, .. } => {
                self.registry
                    .get_or_create(&sender)
                    .send(SessionCommand::RemoteOffer(sdp))
                    .await;
            }
            SignalMessage::Answer { sender, sdp, .. } => match self.registry.get(&sender) {
                Some(handle) => handle.send(SessionCommand::RemoteAnswer(sdp)).await,
                // We must have sent the offer this answers; if the
                // session is gone the round is over.
                None => warn!(sender = %sender, "answer for unknown session dropped"),
            },
            SignalMessage::Candidate {
                sender, candidate, ..
            } => {
                // get_or_create: on an unordered bus a candidate can
                // overtake the offer it belongs to; the fresh session
                // buffers it until a remote description lands.
                self.registry
                    .get_or_create(&sender)
                    .send(SessionCommand::RemoteCandidate(candidate))
                    .await;
            }
            SignalMessage::Leave { sender } => {
                if self.registry.remove(&sender).await {
                    info!(sender = %sender, "peer left");
                }
                self.emit(RoomEvent::PeerLeft(sender));
            }
        }
    }

    /// Join policy (applied uniformly): a Join never triggers an offer.
    /// A ready member re-announces Ready instead, so a newcomer learns
    /// about members whose original Ready it missed; the Ready rule below
    /// then produces exactly one offer per pair.
    async fn handle_join(&mut self, sender: ClientId) {
        debug!(sender = %sender, "peer announced join");
        if self.membership.is_ready() {
            self.publisher.announce_ready().await;
        }
        self.emit(RoomEvent::PeerJoined(sender));
    }

    /// The glare tie-break: offer only when both sides are ready and the
    /// local id is the lexicographically smaller of the pair. The session
    /// ignores StartOffer unless it is still Idle, which makes the
    /// re-announced Ready broadcasts harmless.
    async fn handle_ready(&mut self, sender: ClientId) {
        if !self.membership.is_ready() {
            return;
        }
        if self.local_id >= sender {
            // The larger id waits for the peer's offer.
            return;
        }
        self.registry
            .get_or_create(&sender)
            .send(SessionCommand::StartOffer)
            .await;
    }

    async fn handle_connection_event(&mut self, evt: ConnectionEvent) {
        match evt {
            ConnectionEvent::CandidateGenerated(remote, candidate) => {
                // Local candidates go out the moment the engine gathers
                // them; they are never buffered on this side.
                self.publisher.send_candidate(remote, candidate).await;
            }
            ConnectionEvent::TrackReceived(remote, track) => {
                self.emit(RoomEvent::RemoteTrack {
                    from: remote,
                    track,
                });
            }
            ConnectionEvent::Failed(remote) => {
                warn!(remote = %remote, "connection failed, dropping session");
                self.registry.remove(&remote).await;
                self.emit(RoomEvent::SessionFailed(remote));
            }
        }
    }

    async fn handle_reconnect(&mut self) {
        info!(client = %self.local_id, "signal bus reconnected, re-announcing");
        self.publisher.announce_join().await;
        if self.membership.is_ready() {
            self.publisher.announce_ready().await;
        }
    }

    async fn hangup(&mut self) {
        info!(room = %self.membership.room_id(), client = %self.local_id, "hanging up");
        self.publisher.announce_leave().await;
        self.registry.close_all().await;
        self.membership.release_media();
        self.membership.release().await;
    }

    /// Best-effort: the room loop never blocks on a slow event consumer.
    fn emit(&self, event: RoomEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            debug!("room event dropped: {e}");
        }
    }
}
