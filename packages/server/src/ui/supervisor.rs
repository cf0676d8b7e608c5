//! Process-wide room management.
//!
//! Wires repository, message pusher factory, launcher and use cases together
//! and starts the rooms requested on the command line.

use std::{net::SocketAddr, sync::Arc};

use crate::{
    domain::{
        ChatRoom, LaunchError, MessagePusher, Port, RoomId, RoomRepository, ShutdownReceiver,
    },
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    usecase::{CreateRoomError, CreateRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase},
};

use super::{
    config::ServerConfig,
    server::{AxumRoomLauncher, RoomServer},
    state::AdminState,
};

fn websocket_message_pusher() -> Arc<dyn MessagePusher> {
    Arc::new(WebSocketMessagePusher::new())
}

pub struct Supervisor {
    config: Arc<ServerConfig>,
    repository: Arc<dyn RoomRepository>,
    launcher: Arc<AxumRoomLauncher>,
    create_room_usecase: Arc<CreateRoomUseCase>,
}

impl Supervisor {
    pub fn new(config: ServerConfig, shutdown: ShutdownReceiver) -> Self {
        let config = Arc::new(config);
        let repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let launcher = Arc::new(AxumRoomLauncher::new(config.clone(), shutdown));
        let create_room_usecase = Arc::new(CreateRoomUseCase::new(
            repository.clone(),
            launcher.clone(),
            websocket_message_pusher,
            config.broadcast_capacity,
        ));

        Self {
            config,
            repository,
            launcher,
            create_room_usecase,
        }
    }

    pub fn repository(&self) -> Arc<dyn RoomRepository> {
        self.repository.clone()
    }

    /// Start the `main` room on `port` together with the admin API.
    ///
    /// # Errors
    ///
    /// Fails if the port is already registered or cannot be bound; the room
    /// is not left in the registry in either case.
    pub async fn start_primary(&self, port: Port) -> Result<SocketAddr, CreateRoomError> {
        let room = Arc::new(self.create_room_usecase.build(RoomId::primary(), port));
        self.repository.insert(room.clone()).await?;

        let admin = Arc::new(AdminState {
            create_room_usecase: self.create_room_usecase.clone(),
            get_rooms_usecase: GetRoomsUseCase::new(self.repository.clone()),
            get_room_detail_usecase: GetRoomDetailUseCase::new(self.repository.clone()),
        });

        let started: Result<SocketAddr, LaunchError> = async {
            let server = RoomServer::new(room.clone(), self.config.clone())
                .with_admin(admin)
                .bind()
                .await?;
            self.launcher.start(server).await
        }
        .await;

        match started {
            Ok(addr) => {
                tracing::info!("Admin API available at http://{}/api/create-server", addr);
                Ok(addr)
            }
            Err(e) => {
                self.repository.remove(&port).await;
                Err(e.into())
            }
        }
    }

    /// Start a room with a fixed id, e.g. `chat1`.
    pub async fn start_room(
        &self,
        id: RoomId,
        port: Port,
    ) -> Result<Arc<ChatRoom>, CreateRoomError> {
        self.create_room_usecase.start(id, port).await
    }

    /// Start a `custom-<port>` room from a raw port argument.
    pub async fn start_custom(&self, raw_port: &str) -> Result<Arc<ChatRoom>, CreateRoomError> {
        self.create_room_usecase.execute(raw_port).await
    }

    /// Wait until every started room has shut down.
    pub async fn wait(&self) {
        self.launcher.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::watch;

    fn local_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_start_primary_rolls_back_on_bind_failure() {
        // テスト項目: プライマリの bind に失敗したらレジストリに残らない
        // given (前提条件):
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = Port::new(occupied.local_addr().unwrap().port()).unwrap();
        let (_tx, shutdown) = watch::channel(false);
        let supervisor = Supervisor::new(local_config(), shutdown);

        // when (操作):
        let result = supervisor.start_primary(port).await;

        // then (期待する結果):
        assert!(matches!(result, Err(CreateRoomError::Launch(_))));
        assert!(supervisor.repository().get(&port).await.is_none());
    }

    #[tokio::test]
    async fn test_start_custom_rejects_invalid_port() {
        // テスト項目: 不正なポート文字列ではルームが作られない
        // given (前提条件):
        let (_tx, shutdown) = watch::channel(false);
        let supervisor = Supervisor::new(local_config(), shutdown);

        // when (操作):
        let result = supervisor.start_custom("80").await;

        // then (期待する結果):
        assert!(matches!(result, Err(CreateRoomError::InvalidPort(_))));
        assert!(supervisor.repository().list().await.is_empty());
    }
}
