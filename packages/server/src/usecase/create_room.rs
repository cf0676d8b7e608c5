//! UseCase: ルーム作成処理
//!
//! ポートを検証し、レジストリに登録してから HTTP リスナーを起動します。
//! リスナーの起動に失敗した場合はレジストリから取り除きます。

use std::sync::Arc;

use crate::domain::{
    ChatRoom, MessagePusherFactory, Port, RoomId, RoomLauncher, RoomRepository,
};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// RoomLauncher（リスナー起動の抽象化）
    launcher: Arc<dyn RoomLauncher>,
    message_pusher_factory: MessagePusherFactory,
    broadcast_capacity: usize,
}

impl CreateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        launcher: Arc<dyn RoomLauncher>,
        message_pusher_factory: MessagePusherFactory,
        broadcast_capacity: usize,
    ) -> Self {
        Self {
            repository,
            launcher,
            message_pusher_factory,
            broadcast_capacity,
        }
    }

    /// Create a `custom-<port>` room from a raw port string.
    ///
    /// # Errors
    ///
    /// * `CreateRoomError::InvalidPort` - not an integer in [1024, 65535]
    /// * `CreateRoomError::Duplicate` - a room already uses the port
    /// * `CreateRoomError::Launch` - the listener could not be started
    pub async fn execute(&self, raw_port: &str) -> Result<Arc<ChatRoom>, CreateRoomError> {
        let port = Port::parse(raw_port)?;
        self.start(RoomId::custom(port), port).await
    }

    /// Create a room with an explicit id (statically configured rooms).
    pub async fn start(&self, id: RoomId, port: Port) -> Result<Arc<ChatRoom>, CreateRoomError> {
        let room = Arc::new(self.build(id, port));
        self.repository.insert(room.clone()).await?;

        match self.launcher.launch(room.clone()).await {
            Ok(addr) => {
                tracing::info!("Started chat server {} on {}", room.id(), addr);
                Ok(room)
            }
            Err(e) => {
                tracing::error!("Error starting server {}: {}", room.id(), e);
                self.repository.remove(&port).await;
                Err(e.into())
            }
        }
    }

    /// Build a room without registering or launching it.
    pub fn build(&self, id: RoomId, port: Port) -> ChatRoom {
        ChatRoom::new(
            id,
            port,
            (self.message_pusher_factory)(),
            self.broadcast_capacity,
        )
    }
}
