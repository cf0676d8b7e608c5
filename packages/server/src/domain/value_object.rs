//! Value objects of the chat broker.

use std::{fmt, str::FromStr};

use serde::Serialize;
use uuid::Uuid;

use super::error::PortError;

/// TCP port a room listens on; also the room's unique key in the registry.
///
/// Only unprivileged ports (1024..=65535) are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    pub const MIN: u16 = 1024;
    pub const MAX: u16 = 65535;

    /// Parse a decimal port string such as the `port` query parameter.
    ///
    /// The raw input is kept in the error so callers can echo it back.
    pub fn parse(raw: &str) -> Result<Self, PortError> {
        let invalid = || PortError::Invalid(raw.to_string());
        let value: i64 = raw.parse().map_err(|_| invalid())?;
        u16::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn new(value: u16) -> Result<Self, PortError> {
        if value < Self::MIN {
            return Err(PortError::Invalid(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a room, used in greetings and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Label of the room that also serves the admin endpoint.
    pub const PRIMARY: &'static str = "main";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn primary() -> Self {
        Self::new(Self::PRIMARY)
    }

    /// Identifier of a room created at runtime: `custom-<port>`.
    pub fn custom(port: Port) -> Self {
        Self(format!("custom-{}", port))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one accepted WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn now() -> Self {
        Self(roomcast_shared::time::now_millis())
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
