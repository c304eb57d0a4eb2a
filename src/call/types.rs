use serde::{Deserialize, Serialize};

use crate::room::RoomModel;

/// Room joined when a request names none
pub const DEFAULT_ROOM: &str = "lobby";

pub const JOIN_FAILED_MESSAGE: &str = "failed to set up participant";
pub const END_FAILED_MESSAGE: &str = "Failed to end the room/session";

/// Request payload for joining a call
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct JoinCallRequest {
    #[serde(default)]
    pub audio: bool,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub room: Option<String>,
}

impl JoinCallRequest {
    /// Requested room name, falling back to the lobby when absent or empty
    pub fn room_name(&self) -> &str {
        match self.room.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_ROOM,
        }
    }
}

/// Response for a successful join
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinCallResponse {
    pub message: String,
    pub token: String,
    pub room: RoomModel,
}

/// Query string of the end-session endpoint
#[derive(Debug, Deserialize)]
pub struct EndSessionQuery {
    pub room_name: Option<String>,
}

/// Response for an ended session
#[derive(Debug, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub status: u16,
    pub message: String,
    pub removed: usize,
    pub failed: usize,
}
