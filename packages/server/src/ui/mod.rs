//! UI 層（HTTP / WebSocket）
//!
//! axum のルーター、ハンドラ、ルームごとのリスナー起動とプロセス全体の
//! ルーム管理（Supervisor）を提供します。

mod config;
mod handler;
mod server;
mod signal;
pub mod state;
mod supervisor;

pub use config::{STATIC_ROOMS, ServerConfig};
pub use server::{AxumRoomLauncher, BoundRoomServer, RoomServer, admin_router};
pub use signal::shutdown_signal;
pub use supervisor::Supervisor;
