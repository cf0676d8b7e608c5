//! Runtime configuration shared by every room.

use std::path::PathBuf;

/// Rooms started next to the primary room: (id, port).
pub const STATIC_ROOMS: [(&str, u16); 2] = [("chat1", 8081), ("chat2", 8082)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address every room listener binds to
    pub host: String,
    /// Directory served on `/` by every room
    pub public_dir: PathBuf,
    /// Depth of each client's outbound queue; a client whose queue overflows is closed
    pub outbound_capacity: usize,
    /// Depth of each room's broadcast intake
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            public_dir: PathBuf::from("./public"),
            outbound_capacity: 64,
            broadcast_capacity: 256,
        }
    }
}
