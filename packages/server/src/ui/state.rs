//! Handler state.

use std::sync::Arc;

use crate::{
    domain::ChatRoom,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, ReceiveMessageUseCase,
    },
};

/// State of one room's WebSocket endpoint
pub struct RoomState {
    pub room: Arc<ChatRoom>,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: ConnectClientUseCase,
    /// ReceiveMessageUseCase（受信フレーム処理のユースケース）
    pub receive_message_usecase: ReceiveMessageUseCase,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: DisconnectClientUseCase,
    /// Depth of the outbound queue created for each connection
    pub outbound_capacity: usize,
}

impl RoomState {
    pub fn new(room: Arc<ChatRoom>, outbound_capacity: usize) -> Self {
        Self {
            connect_client_usecase: ConnectClientUseCase::new(room.clone()),
            receive_message_usecase: ReceiveMessageUseCase::new(room.clone()),
            disconnect_client_usecase: DisconnectClientUseCase::new(room.clone()),
            room,
            outbound_capacity: outbound_capacity.max(1),
        }
    }
}

/// State of the admin API served by the primary room
pub struct AdminState {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: GetRoomsUseCase,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: GetRoomDetailUseCase,
}
