//! Wire messages sent from the server to clients.
//!
//! Every frame is plain UTF-8 text. Lifecycle and instructional notices carry
//! the `SYSTEM_MSG:` prefix; chat lines are `<name>: <text>`.

use std::fmt;

use super::value_object::RoomId;

pub const SYSTEM_PREFIX: &str = "SYSTEM_MSG:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    /// Sent to a freshly connected client only
    Greeting { room_id: RoomId },
    /// Sent to the client that just declared its name only
    UsernameSet { name: String },
    Joined { name: String },
    Left { name: String },
    Chat { name: String, text: String },
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greeting { room_id } => write!(
                f,
                "{SYSTEM_PREFIX}Welcome to chat server {room_id}! Please type your username to begin."
            ),
            Self::UsernameSet { name } => write!(
                f,
                "{SYSTEM_PREFIX}Username set to {name}. Welcome to the chat!"
            ),
            Self::Joined { name } => write!(f, "{SYSTEM_PREFIX}{name} has joined the chat"),
            Self::Left { name } => write!(f, "{SYSTEM_PREFIX}{name} has left the chat"),
            Self::Chat { name, text } => write!(f, "{name}: {text}"),
        }
    }
}
