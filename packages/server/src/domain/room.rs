//! Runtime handle of one chat room.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::{
    entity::Room,
    error::BroadcastError,
    message::WireMessage,
    message_pusher::MessagePusher,
    value_object::{Port, RoomId},
};

/// Receiving end of a room's broadcast intake; owned by its dispatcher.
pub type BroadcastReceiver = mpsc::Receiver<String>;

/// One chat room: metadata, client set and broadcast intake.
///
/// Reader tasks enqueue formatted frames with [`ChatRoom::enqueue`]; a single
/// dispatcher drains them. The receiver can be taken only once, so a second
/// dispatcher can never start.
pub struct ChatRoom {
    room: Room,
    message_pusher: Arc<dyn MessagePusher>,
    broadcast_tx: mpsc::Sender<String>,
    broadcast_rx: Mutex<Option<BroadcastReceiver>>,
}

impl ChatRoom {
    pub fn new(
        id: RoomId,
        port: Port,
        message_pusher: Arc<dyn MessagePusher>,
        broadcast_capacity: usize,
    ) -> Self {
        let (broadcast_tx, broadcast_rx) = mpsc::channel(broadcast_capacity.max(1));
        Self {
            room: Room::new(id, port),
            message_pusher,
            broadcast_tx,
            broadcast_rx: Mutex::new(Some(broadcast_rx)),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.room.id
    }

    pub fn port(&self) -> Port {
        self.room.port
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn message_pusher(&self) -> Arc<dyn MessagePusher> {
        self.message_pusher.clone()
    }

    /// Queue a frame for fan-out to every client of this room.
    ///
    /// Waits while the intake is full.
    pub async fn enqueue(&self, message: WireMessage) -> Result<(), BroadcastError> {
        self.broadcast_tx
            .send(message.to_string())
            .await
            .map_err(|_| BroadcastError::Closed(self.room.id.clone()))
    }

    /// Hand the intake receiver to the dispatcher. `None` once taken.
    pub fn take_broadcast_receiver(&self) -> Option<BroadcastReceiver> {
        self.broadcast_rx.lock().ok()?.take()
    }
}

impl std::fmt::Debug for ChatRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRoom").field("room", &self.room).finish()
    }
}
