//! UseCase 層
//!
//! ルームの参加・発言・退出・配信と、ルームの作成・参照を
//! 1 操作 1 構造体で提供します。

mod connect_client;
mod create_room;
mod disconnect_client;
mod dispatch_messages;
mod error;
mod get_rooms;
mod receive_message;

pub use connect_client::{ConnectClientUseCase, ConnectedClient};
pub use create_room::CreateRoomUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use dispatch_messages::DispatchMessagesUseCase;
pub use error::{ConnectError, CreateRoomError, GetRoomDetailError, ReceiveError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase, RoomSnapshot};
pub use receive_message::ReceiveMessageUseCase;
