//! UseCase: 受信フレームの処理
//!
//! クライアントから届いたテキストフレームを処理します。
//! 最初のフレームは名前の宣言、それ以降はチャット本文として扱います。

use std::sync::Arc;

use crate::domain::{ChatRoom, ConnectionId, FrameOrigin, MessagePushError, WireMessage};

use super::error::ReceiveError;

/// 受信フレーム処理のユースケース
pub struct ReceiveMessageUseCase {
    room: Arc<ChatRoom>,
}

impl ReceiveMessageUseCase {
    pub fn new(room: Arc<ChatRoom>) -> Self {
        Self { room }
    }

    /// 受信したテキストフレームを処理
    ///
    /// # Returns
    ///
    /// * `Ok(FrameOrigin)` - 名前の宣言かチャットか
    /// * `Err(ReceiveError)` - クライアントが既に削除されている、または配信キューが閉じている
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        text: &str,
    ) -> Result<FrameOrigin, ReceiveError> {
        let message_pusher = self.room.message_pusher();
        let origin = message_pusher
            .classify_frame(connection_id, text)
            .await
            .ok_or(ReceiveError::ClientNotFound(*connection_id))?;

        match &origin {
            FrameOrigin::Declaration { name } => {
                let confirmation = WireMessage::UsernameSet { name: name.clone() };
                if let Err(e) = message_pusher
                    .push_to(connection_id, &confirmation.to_string())
                    .await
                {
                    return Err(self.handle_push_failure(name, e).await);
                }

                self.room
                    .enqueue(WireMessage::Joined { name: name.clone() })
                    .await?;
                tracing::info!("[Room {}] User connected: {}", self.room.id(), name);
            }
            FrameOrigin::Chat { name } => {
                tracing::debug!("[Room {}] {}: {}", self.room.id(), name, text);
                self.room
                    .enqueue(WireMessage::Chat {
                        name: name.clone(),
                        text: text.to_string(),
                    })
                    .await?;
            }
        }

        Ok(origin)
    }

    /// The failed push already removed the client; announce its departure.
    async fn handle_push_failure(&self, name: &str, error: MessagePushError) -> ReceiveError {
        if !matches!(error, MessagePushError::ClientNotFound(_)) {
            let left = WireMessage::Left {
                name: name.to_string(),
            };
            if let Err(e) = self.room.enqueue(left).await {
                tracing::debug!("Leave notice dropped: {}", e);
            }
        }
        ReceiveError::Evicted(error)
    }
}
