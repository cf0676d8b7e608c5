//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ルームに接続中のクライアント（接続 ID → 名前・送信キュー）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket への書き込みは UI 層（`ui/handler/websocket.rs`）の writer タスクが
//! 行います。この実装は各クライアントの有界キューに `try_send` するだけなので、
//! 遅いクライアントがブロードキャスト全体を止めることはありません。
//! キューが満杯、または writer が終了していた場合は、そのクライアントを
//! 同じクリティカルセクション内で削除し、`PusherChannel::close` で writer を
//! 止めて接続を閉じます（相手が読み取りを止めていても閉じられる）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{
    ClientEntry, ClientName, ConnectionId, FrameOrigin, MessagePushError, MessagePusher,
    Participant, PusherChannel,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアント
    ///
    /// Key: ConnectionId
    /// Value: ClientEntry（名前・接続時刻・送信キュー）
    clients: Mutex<HashMap<ConnectionId, ClientEntry>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

fn try_push(
    connection_id: ConnectionId,
    entry: &ClientEntry,
    content: &str,
) -> Result<(), MessagePushError> {
    entry
        .sender
        .try_send(content.to_string())
        .map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(connection_id),
            TrySendError::Closed(_) => MessagePushError::QueueClosed(connection_id),
        })
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> ClientName {
        let mut clients = self.clients.lock().await;
        // 仮の名前はレジストリと同じロックの中で決める
        let name = ClientName::provisional(clients.len() + 1);
        clients.insert(connection_id, ClientEntry::new(name.clone(), sender));
        tracing::debug!(
            "Client '{}' registered as '{}'",
            connection_id,
            name.as_str()
        );
        name
    }

    async fn classify_frame(
        &self,
        connection_id: &ConnectionId,
        text: &str,
    ) -> Option<FrameOrigin> {
        let mut clients = self.clients.lock().await;
        let entry = clients.get_mut(connection_id)?;

        match &entry.name {
            ClientName::Named(name) => Some(FrameOrigin::Chat { name: name.clone() }),
            ClientName::Provisional(_) => {
                entry.name = ClientName::Named(text.to_string());
                Some(FrameOrigin::Declaration {
                    name: text.to_string(),
                })
            }
        }
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<ClientName> {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(connection_id).map(|entry| entry.name);
        if removed.is_some() {
            tracing::debug!("Client '{}' unregistered", connection_id);
        }
        removed
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;

        let Some(entry) = clients.get(connection_id) else {
            return Err(MessagePushError::ClientNotFound(*connection_id));
        };

        if let Err(e) = try_push(*connection_id, entry, content) {
            tracing::warn!("Evicting client: {}", e);
            if let Some(entry) = clients.remove(connection_id) {
                entry.sender.close();
            }
            return Err(e);
        }
        Ok(())
    }

    async fn broadcast(&self, content: &str) -> Vec<ClientName> {
        let mut clients = self.clients.lock().await;

        let mut failed = Vec::new();
        for (connection_id, entry) in clients.iter() {
            if let Err(e) = try_push(*connection_id, entry, content) {
                tracing::warn!("Evicting client during broadcast: {}", e);
                failed.push(*connection_id);
            }
        }

        failed
            .iter()
            .filter_map(|connection_id| clients.remove(connection_id))
            .map(|entry| {
                entry.sender.close();
                entry.name
            })
            .collect()
    }

    async fn close_all(&self) -> usize {
        let mut clients = self.clients.lock().await;
        let closed = clients.len();
        for (_, entry) in clients.drain() {
            entry.sender.close();
        }
        closed
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    async fn participants(&self) -> Vec<Participant> {
        let clients = self.clients.lock().await;
        let mut participants: Vec<Participant> = clients
            .iter()
            .map(|(connection_id, entry)| Participant {
                connection_id: *connection_id,
                name: entry.name.as_str().to_string(),
                named: entry.name.is_named(),
                connected_at: entry.connected_at,
            })
            .collect();

        // Sort by connection time for consistent ordering
        participants.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        participants
    }
}
