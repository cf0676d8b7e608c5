//! HTTP API endpoint handlers (primary room only).

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{Method, StatusCode},
};
use serde::Deserialize;

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AdminState,
    usecase::GetRoomDetailError,
};

/// Query parameters for room creation
#[derive(Debug, Deserialize)]
pub struct CreateServerQuery {
    pub port: Option<String>,
}

/// `/api/create-server?port=<N>`: start a new room on port N.
///
/// Responds once the new listener is bound.
pub async fn create_server(
    method: Method,
    State(state): State<Arc<AdminState>>,
    query: Result<Query<CreateServerQuery>, QueryRejection>,
) -> (StatusCode, String) {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        );
    }

    let port = query
        .ok()
        .and_then(|Query(query)| query.port)
        .filter(|port| !port.is_empty());
    let Some(port) = port else {
        return (
            StatusCode::BAD_REQUEST,
            "Port parameter is required".to_string(),
        );
    };

    match state.create_room_usecase.execute(&port).await {
        Ok(room) => {
            tracing::info!("Started custom server {} on port {}", room.id(), room.port());
            (
                StatusCode::OK,
                format!("Server started on port {}", room.port()),
            )
        }
        Err(e) => {
            tracing::warn!("Failed to create server on port {}: {}", port, e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AdminState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    Json(
        rooms
            .iter()
            .map(|snapshot| RoomSummaryDto::new(&snapshot.room, snapshot.clients))
            .collect(),
    )
}

/// Get room detail by port
pub async fn get_room_detail(
    State(state): State<Arc<AdminState>>,
    Path(port): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(&port).await {
        Ok((room, participants)) => Ok(Json(RoomDetailDto::new(&room, participants))),
        Err(GetRoomDetailError::InvalidPort(_)) => Err(StatusCode::BAD_REQUEST),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
