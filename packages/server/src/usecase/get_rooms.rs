//! UseCase: ルーム一覧・ルーム詳細の取得

use std::sync::Arc;

use crate::domain::{Participant, Port, Room, RoomRepository};

use super::error::GetRoomDetailError;

/// A room and how many clients it currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub room: Room,
    pub clients: usize,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// All rooms ordered by port
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        let mut snapshots = Vec::new();
        for chat_room in self.repository.list().await {
            snapshots.push(RoomSnapshot {
                room: chat_room.room().clone(),
                clients: chat_room.message_pusher().count_clients().await,
            });
        }
        snapshots
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        raw_port: &str,
    ) -> Result<(Room, Vec<Participant>), GetRoomDetailError> {
        let port = Port::parse(raw_port)?;
        let chat_room = self
            .repository
            .get(&port)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let participants = chat_room.message_pusher().participants().await;
        Ok((chat_room.room().clone(), participants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatRoom, ConnectionId, RoomId},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use tokio::sync::mpsc;

    async fn create_repository() -> Arc<InMemoryRoomRepository> {
        let repository = Arc::new(InMemoryRoomRepository::new());
        for (id, port) in [("chat1", "8081"), ("main", "8080")] {
            let room = Arc::new(ChatRoom::new(
                RoomId::new(id),
                Port::parse(port).unwrap(),
                Arc::new(WebSocketMessagePusher::new()),
                8,
            ));
            repository.insert(room).await.unwrap();
        }
        repository
    }

    #[tokio::test]
    async fn test_get_rooms_reports_client_counts() {
        // テスト項目: 各ルームの接続数がポート順の一覧で返される
        // given (前提条件):
        let repository = create_repository().await;
        let main = repository.get(&Port::parse("8080").unwrap()).await.unwrap();
        let (tx, _rx) = mpsc::channel::<String>(8);
        main.message_pusher()
            .register_client(ConnectionId::generate(), tx.into())
            .await;
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let snapshots = usecase.execute().await;

        // then (期待する結果):
        let summary: Vec<(String, usize)> = snapshots
            .into_iter()
            .map(|s| (s.room.id.to_string(), s.clients))
            .collect();
        assert_eq!(
            summary,
            vec![("main".to_string(), 1), ("chat1".to_string(), 0)]
        );
    }

    #[tokio::test]
    async fn test_get_room_detail() {
        // テスト項目: ポート指定でルーム詳細が取得でき、未知・不正なポートはエラーになる
        // given (前提条件):
        let repository = create_repository().await;
        let usecase = GetRoomDetailUseCase::new(repository);

        // when (操作):
        let found = usecase.execute("8081").await;
        let missing = usecase.execute("9999").await;
        let invalid = usecase.execute("abc").await;

        // then (期待する結果):
        let (room, participants) = found.unwrap();
        assert_eq!(room.id.as_str(), "chat1");
        assert!(participants.is_empty());
        assert_eq!(missing, Err(GetRoomDetailError::RoomNotFound));
        assert!(matches!(invalid, Err(GetRoomDetailError::InvalidPort(_))));
    }
}
