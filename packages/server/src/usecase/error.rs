//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{
    BroadcastError, ConnectionId, LaunchError, MessagePushError, PortError, RegistryError,
};

/// Errors while accepting a client into a room
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to greet client: outbound queue unavailable")]
    GreetingFailed,
}

/// Errors while handling an inbound text frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// The client was already removed (evicted by the dispatcher).
    #[error("client '{0}' is no longer registered")]
    ClientNotFound(ConnectionId),

    #[error("client evicted: {0}")]
    Evicted(#[source] MessagePushError),

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

/// Errors while creating a room; the Display text is returned to admin callers.
#[derive(Debug, Error)]
pub enum CreateRoomError {
    #[error(transparent)]
    InvalidPort(#[from] PortError),

    #[error(transparent)]
    Duplicate(#[from] RegistryError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error(transparent)]
    InvalidPort(#[from] PortError),

    #[error("room not found")]
    RoomNotFound,
}
