//! UseCase: ブロードキャスト配信（ディスパッチャ）
//!
//! ルームごとに 1 つだけ動くタスクで、ブロードキャストキューから取り出した
//! メッセージを接続中の全クライアントへ順番に配信します。
//! 全クライアントが同じ順序でメッセージを受け取ります。

use std::{collections::VecDeque, sync::Arc};

use tokio::task::JoinHandle;

use crate::domain::{
    BroadcastReceiver, ChatRoom, LaunchError, ShutdownReceiver, WireMessage, wait_for_shutdown,
};

/// ブロードキャスト配信のユースケース
pub struct DispatchMessagesUseCase {
    room: Arc<ChatRoom>,
}

impl DispatchMessagesUseCase {
    pub fn new(room: Arc<ChatRoom>) -> Self {
        Self { room }
    }

    /// Take the room's broadcast intake and run the dispatcher in a new task.
    ///
    /// Fails if a dispatcher was already started for this room.
    pub fn spawn(self, shutdown: ShutdownReceiver) -> Result<JoinHandle<()>, LaunchError> {
        let intake = self
            .room
            .take_broadcast_receiver()
            .ok_or_else(|| LaunchError::DispatcherAlreadyRunning(self.room.id().clone()))?;
        Ok(tokio::spawn(async move { self.run(intake, shutdown).await }))
    }

    /// Drain the intake until shutdown or until every producer is gone, then
    /// close all clients of the room.
    pub async fn run(&self, mut intake: BroadcastReceiver, shutdown: ShutdownReceiver) {
        tracing::debug!("[Room {}] Dispatcher started", self.room.id());

        let shutdown = wait_for_shutdown(shutdown);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                frame = intake.recv() => match frame {
                    Some(frame) => self.deliver(frame).await,
                    None => break,
                },
            }
        }

        let closed = self.room.message_pusher().close_all().await;
        tracing::info!(
            "[Room {}] Dispatcher stopped, closed {} client(s)",
            self.room.id(),
            closed
        );
    }

    /// Fan one frame out to every registered client.
    ///
    /// Clients evicted on the way are announced right after the frame that
    /// evicted them, to the clients that remain.
    pub async fn deliver(&self, frame: String) {
        let message_pusher = self.room.message_pusher();
        let mut pending = VecDeque::from([frame]);

        while let Some(frame) = pending.pop_front() {
            for name in message_pusher.broadcast(&frame).await {
                let name = name.into_string();
                tracing::warn!("[Room {}] Client '{}' evicted", self.room.id(), name);
                pending.push_back(WireMessage::Left { name }.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, Port, PusherChannel, RoomId},
        infrastructure::message_pusher::WebSocketMessagePusher,
    };
    use tokio::sync::{mpsc, watch};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - キューに入った順に全クライアントへ配信されること（全体順序）
    // - 遅いクライアントが削除され、残りのクライアントに退出通知が届くこと
    // - シャットダウンで全クライアントが閉じられること
    // - ディスパッチャが 2 つ起動しないこと
    // ========================================

    fn create_test_room() -> Arc<ChatRoom> {
        Arc::new(ChatRoom::new(
            RoomId::primary(),
            Port::parse("8080").unwrap(),
            Arc::new(WebSocketMessagePusher::new()),
            16,
        ))
    }

    async fn join(room: &ChatRoom, name: &str, capacity: usize) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(capacity);
        let tx = PusherChannel::new(tx);
        let id = ConnectionId::generate();
        room.message_pusher().register_client(id, tx).await;
        room.message_pusher().classify_frame(&id, name).await;
        rx
    }

    #[tokio::test]
    async fn test_every_client_observes_the_same_order() {
        // テスト項目: 全クライアントがキュー順に同じメッセージ列を受け取る
        // given (前提条件):
        let room = create_test_room();
        let mut alice = join(&room, "alice", 16).await;
        let mut bob = join(&room, "bob", 16).await;
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = DispatchMessagesUseCase::new(room.clone())
            .spawn(shutdown_rx)
            .unwrap();

        // when (操作):
        for text in ["one", "two", "three"] {
            room.enqueue(WireMessage::Chat {
                name: "alice".to_string(),
                text: text.to_string(),
            })
            .await
            .unwrap();
        }

        // then (期待する結果):
        for expected in ["alice: one", "alice: two", "alice: three"] {
            assert_eq!(alice.recv().await.as_deref(), Some(expected));
            assert_eq!(bob.recv().await.as_deref(), Some(expected));
        }
        handle.abort();
    }

    #[tokio::test]
    async fn test_slow_client_is_evicted_and_announced() {
        // テスト項目: キューが満杯のクライアントは削除され、残りに退出通知が届く
        // given (前提条件):
        let room = create_test_room();
        let mut alice = join(&room, "alice", 16).await;
        let _snail = join(&room, "snail", 1).await;
        let usecase = DispatchMessagesUseCase::new(room.clone());
        usecase.deliver("first".to_string()).await;
        alice.recv().await;

        // when (操作):
        usecase.deliver("second".to_string()).await;

        // then (期待する結果):
        assert_eq!(alice.recv().await.as_deref(), Some("second"));
        assert_eq!(
            alice.recv().await.as_deref(),
            Some("SYSTEM_MSG:snail has left the chat")
        );
        assert_eq!(room.message_pusher().count_clients().await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_closes_all_clients() {
        // テスト項目: シャットダウン通知でディスパッチャが終了し、全クライアントが閉じる
        // given (前提条件):
        let room = create_test_room();
        let mut alice = join(&room, "alice", 16).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = DispatchMessagesUseCase::new(room.clone())
            .spawn(shutdown_rx)
            .unwrap();

        // when (操作):
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // then (期待する結果):
        assert_eq!(alice.recv().await, None);
        assert_eq!(room.message_pusher().count_clients().await, 0);
    }

    #[tokio::test]
    async fn test_second_dispatcher_is_refused() {
        // テスト項目: 同じルームに 2 つ目のディスパッチャは起動できない
        // given (前提条件):
        let room = create_test_room();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let first = DispatchMessagesUseCase::new(room.clone())
            .spawn(shutdown_rx.clone())
            .unwrap();

        // when (操作):
        let second = DispatchMessagesUseCase::new(room.clone()).spawn(shutdown_rx);

        // then (期待する結果):
        assert!(matches!(
            second,
            Err(LaunchError::DispatcherAlreadyRunning(_))
        ));
        first.abort();
    }
}
