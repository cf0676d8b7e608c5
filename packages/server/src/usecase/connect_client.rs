//! UseCase: クライアント接続処理
//!
//! 仮の名前での登録と挨拶の送信を担当します。

use std::sync::Arc;

use crate::domain::{ChatRoom, ClientName, ConnectionId, PusherChannel, WireMessage};

use super::error::ConnectError;

/// A client accepted into a room, still under its provisional name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedClient {
    pub connection_id: ConnectionId,
    pub name: ClientName,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    room: Arc<ChatRoom>,
}

impl ConnectClientUseCase {
    pub fn new(room: Arc<ChatRoom>) -> Self {
        Self { room }
    }

    /// クライアント接続を実行
    ///
    /// The greeting is queued on the client's own channel before the client
    /// becomes visible to the dispatcher, so it is always the first frame the
    /// client receives.
    ///
    /// # Arguments
    ///
    /// * `sender` - 新しい接続の送信キュー
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectedClient, ConnectError> {
        let greeting = WireMessage::Greeting {
            room_id: self.room.id().clone(),
        };
        sender
            .try_send(greeting.to_string())
            .map_err(|_| ConnectError::GreetingFailed)?;

        let connection_id = ConnectionId::generate();
        let name = self
            .room
            .message_pusher()
            .register_client(connection_id, sender)
            .await;

        tracing::info!(
            "[Room {}] Client '{}' connected as '{}'",
            self.room.id(),
            connection_id,
            name.as_str()
        );

        Ok(ConnectedClient {
            connection_id,
            name,
        })
    }
}
