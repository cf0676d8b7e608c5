//! RoomLauncher trait 定義
//!
//! ルームの HTTP リスナーを起動する処理の抽象化。UI 層（axum）が実装します。

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;

use super::{error::LaunchError, room::ChatRoom};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomLauncher: Send + Sync {
    /// Bind the room's listener, start its dispatcher and serve it in the background.
    ///
    /// Returns once the listener is bound.
    async fn launch(&self, room: Arc<ChatRoom>) -> Result<SocketAddr, LaunchError>;
}
