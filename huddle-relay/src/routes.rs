use crate::{JoinOutcome, RelayState, ws_handler};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/{id}", get(get_room))
        .route("/api/rooms/{id}/join", post(join_room))
        .route("/api/rooms/{id}/leave", post(leave_room))
        .route("/ws/{room_id}/{client_id}", get(ws_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantBody {
    client_id: String,
}

async fn create_room(State(state): State<RelayState>) -> impl IntoResponse {
    let meeting = state.meetings().create();
    Json(json!({
        "id": meeting.id,
        "joinUrl": format!("/room/{}", meeting.id),
    }))
}

async fn get_room(State(state): State<RelayState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.meetings().get(&id) {
        Some(meeting) => Json(json!({
            "id": meeting.id,
            "createdAt": meeting.created_at_ms,
            "participants": meeting.participants(),
            "limit": meeting.limit,
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn join_room(
    State(state): State<RelayState>,
    Path(id): Path<String>,
    Json(body): Json<ParticipantBody>,
) -> impl IntoResponse {
    match state.meetings().try_join(&id, &body.client_id) {
        JoinOutcome::Admitted {
            participants,
            limit,
        } => Json(json!({
            "allowed": true,
            "participants": participants,
            "limit": limit,
        }))
        .into_response(),
        JoinOutcome::Full => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "allowed": false,
                "reason": "room is at its participant limit",
            })),
        )
            .into_response(),
        JoinOutcome::UnknownRoom => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn leave_room(
    State(state): State<RelayState>,
    Path(id): Path<String>,
    Json(body): Json<ParticipantBody>,
) -> impl IntoResponse {
    match state.meetings().leave(&id, &body.client_id) {
        Some(participants) => Json(json!({
            "left": true,
            "participants": participants,
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
