use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, instrument};

use super::{
    models::RoomModel,
    repository::{AddParticipantResult, EndRoomResult, RoomRepository},
};
use crate::{rtc::RtcPlatform, shared::AppError};

/// Prefix of the tag attached to every platform session, used for auditing and billing
pub const SESSION_TAG_PREFIX: &str = "demo";

/// Derives the platform session tag for a room
pub fn session_tag(room_name: &str) -> String {
    format!("{}.{}", SESSION_TAG_PREFIX, room_name)
}

/// Maps room names onto platform sessions.
///
/// Creation (and recreation of ended rooms) for a given name runs under a
/// per-name lock so that concurrent first joins create exactly one session.
pub struct RoomRegistry {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    platform: Arc<dyn RtcPlatform>,
    room_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RoomRegistry {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        platform: Arc<dyn RtcPlatform>,
    ) -> Self {
        Self {
            repository,
            platform,
            room_locks: Mutex::new(HashMap::new()),
        }
    }

    fn room_lock(&self, name: &str) -> Result<Arc<AsyncMutex<()>>, AppError> {
        let mut locks = self
            .room_locks
            .lock()
            .map_err(|_| AppError::Internal("room lock table poisoned".to_string()))?;
        Ok(Arc::clone(locks.entry(name.to_string()).or_default()))
    }

    /// Returns the active room with this name, creating its session if needed.
    ///
    /// An ended room is replaced by a fresh one backed by a new session.
    #[instrument(skip(self))]
    pub async fn get_or_create_room(&self, name: &str) -> Result<RoomModel, AppError> {
        if let Some(room) = self.repository.get_room(name).await? {
            if room.is_active() {
                debug!(room = %name, session_id = %room.session_id, "Reusing existing room");
                return Ok(room);
            }
        }

        let lock = self.room_lock(name)?;
        let _guard = lock.lock().await;

        // Another request may have created the room while we waited
        let existing = self.repository.get_room(name).await?;
        match &existing {
            Some(room) if room.is_active() => return Ok(room.clone()),
            Some(room) => info!(
                room = %name,
                old_session_id = %room.session_id,
                "Recreating ended room/session"
            ),
            None => info!(room = %name, "Creating room/session"),
        }

        let tag = session_tag(name);
        let session_id = self.platform.create_session(&tag).await.map_err(|e| {
            error!(room = %name, tag = %tag, error = %e, "Failed to create room/session");
            AppError::Upstream(e)
        })?;

        let room = RoomModel::new(name.to_string(), session_id);
        self.repository.save_room(&room).await?;

        info!(room = %name, session_id = %room.session_id, "Room created");
        Ok(room)
    }

    /// Pure lookup
    #[instrument(skip(self))]
    pub async fn get_room(&self, name: &str) -> Result<RoomModel, AppError> {
        self.repository
            .get_room(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("room '{}' not found", name)))
    }

    /// Records a participant that has been added to `room`'s session
    #[instrument(skip(self, room), fields(room_name = %room.name, session_id = %room.session_id))]
    pub async fn add_participant(
        &self,
        room: &RoomModel,
        participant_id: &str,
    ) -> Result<RoomModel, AppError> {
        match self
            .repository
            .add_participant(&room.name, &room.session_id, participant_id)
            .await?
        {
            AddParticipantResult::Success(updated) => Ok(updated),
            AddParticipantResult::SessionChanged(current) => Err(AppError::Conflict(format!(
                "room '{}' moved from session {} to {}",
                room.name, room.session_id, current.session_id
            ))),
            AddParticipantResult::RoomEnded(current) => Err(AppError::Conflict(format!(
                "room '{}' session {} ended",
                room.name, current.session_id
            ))),
            AddParticipantResult::RoomNotFound => {
                Err(AppError::NotFound(format!("room '{}' not found", room.name)))
            }
        }
    }

    /// Marks the room ended and hands back the participants it held at that
    /// moment. Serialized with creation of the same name; once this returns,
    /// no further participant can be recorded into the ended room.
    #[instrument(skip(self))]
    pub async fn mark_ended(&self, name: &str) -> Result<EndRoomResult, AppError> {
        let lock = self.room_lock(name)?;
        let _guard = lock.lock().await;

        self.repository
            .mark_ended(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("room '{}' not found", name)))
    }
}
