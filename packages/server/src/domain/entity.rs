//! Entities held by a room.

use serde::Serialize;

use super::{
    message_pusher::PusherChannel,
    value_object::{ConnectionId, Port, RoomId, Timestamp},
};

/// Display name of a client.
///
/// A client starts with a provisional `User-<N>` placeholder; its first text
/// frame turns it into `Named`. The tag, not the text, decides whether a frame
/// is the username declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientName {
    Provisional(String),
    Named(String),
}

impl ClientName {
    pub fn provisional(ordinal: usize) -> Self {
        Self::Provisional(format!("User-{}", ordinal))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Provisional(name) | Self::Named(name) => name,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Provisional(name) | Self::Named(name) => name,
        }
    }
}

/// Per-connection record of a room.
#[derive(Debug)]
pub struct ClientEntry {
    pub name: ClientName,
    pub connected_at: Timestamp,
    /// Outbound queue drained by the connection's writer task
    pub sender: PusherChannel,
}

impl ClientEntry {
    pub fn new(name: ClientName, sender: PusherChannel) -> Self {
        Self {
            name,
            connected_at: Timestamp::now(),
            sender,
        }
    }
}

/// Read-only view of a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub name: String,
    pub named: bool,
    pub connected_at: Timestamp,
}

/// Room metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub port: Port,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, port: Port) -> Self {
        Self {
            id,
            port,
            created_at: Timestamp::now(),
        }
    }
}
