//! Utilities shared by every roomcast binary.

pub mod logger;
pub mod time;
