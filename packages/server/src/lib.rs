//! Multi-room WebSocket chat broker.
//!
//! Every room listens on its own TCP port. Clients connect to `/ws`, declare a
//! username with their first text frame and then chat; every message is
//! broadcast to all clients of the same room, in one total order per room.
//! The primary room additionally serves an admin API that creates rooms on
//! new ports at runtime.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
