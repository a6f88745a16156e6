use crate::MeetingRegistry;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use huddle_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct RelayInner {
    meetings: MeetingRegistry,
    /// room id -> client id -> outbound socket queue.
    sockets: DashMap<String, DashMap<String, mpsc::UnboundedSender<Message>>>,
}

/// Shared handle threaded through every HTTP and WebSocket handler.
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayInner>,
}

impl RelayState {
    pub fn new(default_limit: usize) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                meetings: MeetingRegistry::new(default_limit),
                sockets: DashMap::new(),
            }),
        }
    }

    pub fn meetings(&self) -> &MeetingRegistry {
        &self.inner.meetings
    }

    fn register_socket(&self, room_id: &str, client_id: &str, tx: mpsc::UnboundedSender<Message>) {
        self.inner
            .sockets
            .entry(room_id.to_owned())
            .or_default()
            .insert(client_id.to_owned(), tx);
    }

    fn unregister_socket(&self, room_id: &str, client_id: &str) {
        if let Some(room) = self.inner.sockets.get(room_id) {
            room.remove(client_id);
        }
        self.inner
            .sockets
            .remove_if(room_id, |_, room| room.is_empty());
    }

    /// Fans a frame out to every socket in the room, the sender's own
    /// included. Echo suppression is the receiving client's job.
    fn broadcast(&self, room_id: &str, text: &str) {
        let Some(room) = self.inner.sockets.get(room_id) else {
            return;
        };
        for entry in room.iter() {
            if entry.value().send(Message::Text(text.into())).is_err() {
                debug!("dropping frame for closed socket {}", entry.key());
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path((room_id, client_id)): Path<(String, String)>,
    State(state): State<RelayState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, room_id, client_id, state))
}

async fn handle_socket(socket: WebSocket, room_id: String, client_id: String, state: RelayState) {
    info!("WebSocket connected: {} in room {}", client_id, room_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.register_socket(&room_id, &client_id, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let room_id = room_id.clone();
        let client_id = client_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        // The relay does not act on signaling content, but
                        // it refuses to fan out frames no client could parse.
                        match serde_json::from_str::<SignalMessage>(&text) {
                            Ok(_) => state.broadcast(&room_id, &text),
                            Err(e) => {
                                warn!("invalid frame from {}: {:?}", client_id, e);
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.unregister_socket(&room_id, &client_id);
    info!("WebSocket disconnected: {} from room {}", client_id, room_id);
}
