//! HTTP API response DTOs.

use serde::Serialize;

use crate::domain::{Participant, Room};
use roomcast_shared::time::timestamp_to_rfc3339;

/// Room summary for the room list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub port: u16,
    pub clients: usize,
    pub created_at: String,
}

/// Participant information in room detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantDto {
    pub name: String,
    pub named: bool,
    pub connected_at: String,
}

/// Room detail with its participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub port: u16,
    pub participants: Vec<ParticipantDto>,
    pub created_at: String,
}

impl RoomSummaryDto {
    pub fn new(room: &Room, clients: usize) -> Self {
        Self {
            id: room.id.to_string(),
            port: room.port.value(),
            clients,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<Participant> for ParticipantDto {
    fn from(participant: Participant) -> Self {
        Self {
            name: participant.name,
            named: participant.named,
            connected_at: timestamp_to_rfc3339(participant.connected_at.value()),
        }
    }
}

impl RoomDetailDto {
    pub fn new(room: &Room, participants: Vec<Participant>) -> Self {
        Self {
            id: room.id.to_string(),
            port: room.port.value(),
            participants: participants.into_iter().map(ParticipantDto::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
