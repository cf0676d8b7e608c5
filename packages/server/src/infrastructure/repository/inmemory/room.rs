//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ポートをキーにした BTreeMap をインメモリのレジストリとして使用します。

use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ChatRoom, Port, RegistryError, RoomRepository};

/// インメモリ Room Repository 実装
///
/// Reads take the shared guard; `insert` holds the exclusive guard across the
/// existence check and the insert.
pub struct InMemoryRoomRepository {
    rooms: RwLock<BTreeMap<Port, Arc<ChatRoom>>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn insert(&self, room: Arc<ChatRoom>) -> Result<(), RegistryError> {
        let mut rooms = self.rooms.write().await;
        match rooms.entry(room.port()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate(room.port())),
            Entry::Vacant(vacant) => {
                tracing::debug!("Room '{}' registered on port {}", room.id(), room.port());
                vacant.insert(room);
                Ok(())
            }
        }
    }

    async fn get(&self, port: &Port) -> Option<Arc<ChatRoom>> {
        self.rooms.read().await.get(port).cloned()
    }

    async fn remove(&self, port: &Port) -> Option<Arc<ChatRoom>> {
        self.rooms.write().await.remove(port)
    }

    async fn list(&self) -> Vec<Arc<ChatRoom>> {
        self.rooms.read().await.values().cloned().collect()
    }
}
