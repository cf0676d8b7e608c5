//! ドメイン層
//!
//! 値オブジェクト・エンティティ・ワイヤメッセージと、
//! 外側の層が実装するインターフェース（trait）を定義します。

pub mod entity;
pub mod error;
pub mod launcher;
pub mod message;
pub mod message_pusher;
pub mod repository;
pub mod room;
pub mod shutdown;
pub mod value_object;

pub use entity::{ClientEntry, ClientName, Participant, Room};
pub use error::{BroadcastError, LaunchError, MessagePushError, PortError, RegistryError};
pub use launcher::RoomLauncher;
pub use message::WireMessage;
pub use message_pusher::{FrameOrigin, MessagePusher, MessagePusherFactory, PusherChannel};
pub use repository::RoomRepository;
pub use room::{BroadcastReceiver, ChatRoom};
pub use shutdown::{ShutdownReceiver, wait_for_shutdown};
pub use value_object::{ConnectionId, Port, RoomId, Timestamp};

#[cfg(test)]
pub use launcher::MockRoomLauncher;
