//! ドメイン層のエラー型

use thiserror::Error;

use super::value_object::{ConnectionId, Port, RoomId};

/// Port validation failure; carries the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("invalid port number: {0}")]
    Invalid(String),
}

/// Room registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a server is already running on port {0}")]
    Duplicate(Port),
}

/// Errors while pushing a frame into one client's outbound queue.
///
/// Every variant except `ClientNotFound` means the client has been evicted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(ConnectionId),

    #[error("outbound queue of client '{0}' is full")]
    QueueFull(ConnectionId),

    #[error("outbound queue of client '{0}' is closed")]
    QueueClosed(ConnectionId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("broadcast channel of room '{0}' is closed")]
    Closed(RoomId),
}

/// Errors while starting a room's HTTP listener.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: Port,
        #[source]
        source: std::io::Error,
    },

    #[error("dispatcher of room '{0}' is already running")]
    DispatcherAlreadyRunning(RoomId),
}
