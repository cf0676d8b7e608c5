//! UseCase: クライアント切断処理
//!
//! 退出したクライアントの削除と退出通知を担当します。

use std::sync::Arc;

use crate::domain::{ChatRoom, ConnectionId, WireMessage};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    room: Arc<ChatRoom>,
}

impl DisconnectClientUseCase {
    pub fn new(room: Arc<ChatRoom>) -> Self {
        Self { room }
    }

    /// クライアント切断を実行
    ///
    /// Removes the client and queues the leave notice after the removal, so
    /// the leaver never receives its own notice. A client already evicted by
    /// the dispatcher was announced there; nothing is queued in that case.
    ///
    /// # Returns
    ///
    /// The name the client had when it was removed, if it was still registered.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<String> {
        let name = self
            .room
            .message_pusher()
            .unregister_client(connection_id)
            .await?
            .into_string();

        tracing::info!(
            "[Room {}] Client '{}' ({}) disconnected",
            self.room.id(),
            connection_id,
            name
        );

        if let Err(e) = self
            .room
            .enqueue(WireMessage::Left { name: name.clone() })
            .await
        {
            tracing::debug!("Leave notice for '{}' dropped: {}", name, e);
        }

        Some(name)
    }
}
