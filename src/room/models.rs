use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a room is still backed by a live platform session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Ended,
}

/// A named room mapped onto a platform session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomModel {
    pub name: String,
    pub session_id: String,
    pub participants: Vec<String>, // Participant ids in join order
    pub calls: Vec<String>,         // Reserved, always empty
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    pub status: RoomStatus,
}

impl RoomModel {
    /// Creates a new active room for a freshly created session
    pub fn new(name: String, session_id: String) -> Self {
        Self {
            name,
            session_id,
            participants: vec![],
            calls: vec![],
            start_time: Utc::now(),
            status: RoomStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }

    pub fn has_participant(&self, participant_id: &str) -> bool {
        self.participants.iter().any(|p| p == participant_id)
    }

    /// Appends a participant id, ignoring ids already present
    pub fn add_participant(&mut self, participant_id: String) {
        if !self.has_participant(&participant_id) {
            self.participants.push(participant_id);
        }
    }

    pub fn end(&mut self) {
        self.status = RoomStatus::Ended;
    }
}
