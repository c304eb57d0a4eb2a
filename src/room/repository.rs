use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::RoomModel;
use crate::shared::AppError;

/// Result of attempting to append a participant to a room
#[derive(Debug, Clone)]
pub enum AddParticipantResult {
    /// Participant recorded, returns updated room data
    Success(RoomModel),
    /// Room is now backed by a different session than the participant joined
    SessionChanged(RoomModel),
    /// Room has been ended, its session no longer takes participants
    RoomEnded(RoomModel),
    /// Room does not exist
    RoomNotFound,
}

/// Result of ending a room
#[derive(Debug, Clone)]
pub enum EndRoomResult {
    /// Room was active and is now ended; the snapshot holds the participants to remove
    Ended(RoomModel),
    /// Room had already been ended by an earlier request
    AlreadyEnded(RoomModel),
}

/// Trait for room repository operations
#[async_trait]
pub trait RoomRepository {
    async fn get_room(&self, name: &str) -> Result<Option<RoomModel>, AppError>;

    /// Inserts the room, replacing any existing entry with the same name
    async fn save_room(&self, room: &RoomModel) -> Result<(), AppError>;

    /// Atomically appends a participant if the room is still active and backed by `session_id`
    async fn add_participant(
        &self,
        name: &str,
        session_id: &str,
        participant_id: &str,
    ) -> Result<AddParticipantResult, AppError>;

    /// Atomically marks the room ended and returns the snapshot taken at that moment
    async fn mark_ended(&self, name: &str) -> Result<Option<EndRoomResult>, AppError>;
}

/// In-memory implementation of RoomRepository
///
/// Data is lost when the process exits.
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, RoomModel>>, AppError> {
        self.rooms
            .lock()
            .map_err(|_| AppError::Internal("room store lock poisoned".to_string()))
    }

    #[cfg(test)]
    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn get_room(&self, name: &str) -> Result<Option<RoomModel>, AppError> {
        let room = self.lock()?.get(name).cloned();

        match &room {
            Some(r) => debug!(room = %name, session_id = %r.session_id, "Room found in memory"),
            None => debug!(room = %name, "Room not found in memory"),
        }

        Ok(room)
    }

    #[instrument(skip(self, room), fields(room_name = %room.name))]
    async fn save_room(&self, room: &RoomModel) -> Result<(), AppError> {
        let previous = self.lock()?.insert(room.name.clone(), room.clone());

        if let Some(previous) = previous {
            debug!(
                old_session_id = %previous.session_id,
                new_session_id = %room.session_id,
                "Replaced room in memory"
            );
        } else {
            debug!(session_id = %room.session_id, "Stored new room in memory");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_participant(
        &self,
        name: &str,
        session_id: &str,
        participant_id: &str,
    ) -> Result<AddParticipantResult, AppError> {
        let mut rooms = self.lock()?;

        let room = match rooms.get_mut(name) {
            Some(room) => room,
            None => {
                debug!(room = %name, "Room not found");
                return Ok(AddParticipantResult::RoomNotFound);
            }
        };

        if !room.is_active() {
            warn!(
                room = %name,
                session_id = %room.session_id,
                participant_id = %participant_id,
                "Room ended before participant was recorded"
            );
            return Ok(AddParticipantResult::RoomEnded(room.clone()));
        }

        if room.session_id != session_id {
            warn!(
                room = %name,
                expected_session_id = %session_id,
                current_session_id = %room.session_id,
                "Room session changed before participant was recorded"
            );
            return Ok(AddParticipantResult::SessionChanged(room.clone()));
        }

        room.add_participant(participant_id.to_string());

        info!(
            room = %name,
            participant_id = %participant_id,
            participant_count = room.participants.len(),
            "Participant recorded in room"
        );

        Ok(AddParticipantResult::Success(room.clone()))
    }

    #[instrument(skip(self))]
    async fn mark_ended(&self, name: &str) -> Result<Option<EndRoomResult>, AppError> {
        let mut rooms = self.lock()?;

        Ok(rooms.get_mut(name).map(|room| {
            if !room.is_active() {
                debug!(room = %name, session_id = %room.session_id, "Room already ended");
                return EndRoomResult::AlreadyEnded(room.clone());
            }
            room.end();
            debug!(
                room = %name,
                session_id = %room.session_id,
                participant_count = room.participants.len(),
                "Room marked ended"
            );
            EndRoomResult::Ended(room.clone())
        }))
    }
}
