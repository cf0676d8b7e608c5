//! MessagePusher trait 定義
//!
//! ルームに接続中のクライアント集合と、その集合へのメッセージ配信を抽象化します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::{
    entity::{ClientName, Participant},
    error::MessagePushError,
    value_object::ConnectionId,
};

/// Outbound side of one client connection.
///
/// Frames go through a bounded queue drained by the connection's writer task.
/// `close` aborts the writer even while it is blocked on a peer that stopped
/// reading; dropping the queue only lets the writer finish what is queued.
#[derive(Debug, Clone)]
pub struct PusherChannel {
    queue: mpsc::Sender<String>,
    closer: CancellationToken,
}

impl PusherChannel {
    pub fn new(queue: mpsc::Sender<String>) -> Self {
        Self {
            queue,
            closer: CancellationToken::new(),
        }
    }

    pub fn try_send(&self, frame: String) -> Result<(), TrySendError<String>> {
        self.queue.try_send(frame)
    }

    /// Tear the connection down without waiting for queued frames.
    pub fn close(&self) {
        self.closer.cancel();
    }

    /// Resolved once `close` has been called, for the writer task.
    pub fn close_signal(&self) -> CancellationToken {
        self.closer.clone()
    }
}

impl From<mpsc::Sender<String>> for PusherChannel {
    fn from(queue: mpsc::Sender<String>) -> Self {
        Self::new(queue)
    }
}

/// Builds the client set of a new room.
pub type MessagePusherFactory = fn() -> Arc<dyn MessagePusher>;

/// How an inbound text frame is interpreted for its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOrigin {
    /// First frame of the client: it became the client's name.
    Declaration { name: String },
    /// Any later frame, with the sender's current name.
    Chat { name: String },
}

/// The client set of one room.
///
/// Every mutation happens under the implementation's exclusive guard; a client
/// is removed at most once, either by `unregister_client` or by an eviction
/// inside `push_to` / `broadcast`.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection under a provisional `User-<N>` name and return it.
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> ClientName;

    /// Classify an inbound frame, finalizing the name on the first one.
    ///
    /// Returns `None` when the client is no longer registered.
    async fn classify_frame(&self, connection_id: &ConnectionId, text: &str)
    -> Option<FrameOrigin>;

    /// Remove a client, returning its name if it was still registered.
    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<ClientName>;

    /// Push a frame to a single client.
    async fn push_to(&self, connection_id: &ConnectionId, content: &str)
    -> Result<(), MessagePushError>;

    /// Push a frame to every registered client.
    ///
    /// Clients whose queue is full or closed are evicted in the same critical
    /// section; their names are returned.
    async fn broadcast(&self, content: &str) -> Vec<ClientName>;

    /// Remove every client, closing their queues. Returns how many were closed.
    async fn close_all(&self) -> usize;

    async fn count_clients(&self) -> usize;

    async fn participants(&self) -> Vec<Participant>;
}
