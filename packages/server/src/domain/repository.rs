//! Repository trait 定義
//!
//! プロセス全体のルームレジストリ（ポート → ルーム）へのインターフェース。

use std::sync::Arc;

use async_trait::async_trait;

use super::{error::RegistryError, room::ChatRoom, value_object::Port};

/// Room Registry trait
///
/// At most one room exists per port. `insert` is an atomic insert-if-absent.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a room, failing with `RegistryError::Duplicate` if its port is taken.
    async fn insert(&self, room: Arc<ChatRoom>) -> Result<(), RegistryError>;

    async fn get(&self, port: &Port) -> Option<Arc<ChatRoom>>;

    async fn remove(&self, port: &Port) -> Option<Arc<ChatRoom>>;

    /// All rooms ordered by port
    async fn list(&self) -> Vec<Arc<ChatRoom>>;
}
