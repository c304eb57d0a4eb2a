use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{generators::TagGenerator, types::JoinCallRequest};
use crate::{
    room::{EndRoomResult, RoomModel, RoomRegistry},
    rtc::{permissions_for, RtcPlatform},
    shared::AppError,
};

/// Outcome of a successful join: the participant's token and the room they are in
#[derive(Debug, Clone)]
pub struct JoinedCall {
    pub token: String,
    pub room: RoomModel,
}

/// Outcome of ending a room's session
#[derive(Debug, Clone)]
pub struct EndedSession {
    pub room: RoomModel,
    pub removed: usize,
    pub failed: usize,
}

/// Orchestrates joining and ending calls against the platform
pub struct CallService {
    registry: Arc<RoomRegistry>,
    platform: Arc<dyn RtcPlatform>,
    tag_generator: Arc<dyn TagGenerator>,
}

impl CallService {
    pub fn new(
        registry: Arc<RoomRegistry>,
        platform: Arc<dyn RtcPlatform>,
        tag_generator: Arc<dyn TagGenerator>,
    ) -> Self {
        Self {
            registry,
            platform,
            tag_generator,
        }
    }

    /// Creates a participant, places it in the requested room's session and
    /// returns its join token.
    ///
    /// A participant created upstream is not cleaned up if a later step fails.
    #[instrument(skip(self))]
    pub async fn join_call(&self, request: &JoinCallRequest) -> Result<JoinedCall, AppError> {
        let tag = self.tag_generator.generate();
        let permissions = permissions_for(request.audio, request.video);

        let participant = self
            .platform
            .create_participant(&tag, &permissions)
            .await
            .map_err(|e| {
                error!(tag = %tag, error = %e, "Failed to create participant");
                AppError::Upstream(e)
            })?;
        info!(
            participant_id = %participant.participant_id,
            tag = %tag,
            permissions = %permissions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            "Participant created"
        );

        let room_name = request.room_name();
        let room = match self.registry.get_or_create_room(room_name).await {
            Ok(room) => room,
            Err(e) => {
                warn!(
                    participant_id = %participant.participant_id,
                    room = %room_name,
                    "Participant left orphaned, room could not be resolved"
                );
                return Err(e);
            }
        };

        if let Err(e) = self
            .platform
            .add_participant_to_session(&room.session_id, &participant.participant_id)
            .await
        {
            error!(
                participant_id = %participant.participant_id,
                session_id = %room.session_id,
                error = %e,
                "Failed to add participant to session"
            );
            warn!(
                participant_id = %participant.participant_id,
                "Participant left orphaned"
            );
            return Err(AppError::Upstream(e));
        }

        let room = match self
            .registry
            .add_participant(&room, &participant.participant_id)
            .await
        {
            Ok(room) => room,
            Err(e @ AppError::Conflict(_)) => {
                // The room was ended or replaced after the participant entered
                // its session, so nobody else will ever remove it from there
                self.withdraw(&participant.participant_id, &room.session_id)
                    .await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        info!(
            participant_id = %participant.participant_id,
            room = %room.name,
            participant_count = room.participants.len(),
            "Participant joined room"
        );

        Ok(JoinedCall {
            token: participant.token,
            room,
        })
    }

    async fn withdraw(&self, participant_id: &str, session_id: &str) {
        match self
            .platform
            .remove_participant_from_session(participant_id, session_id)
            .await
        {
            Ok(()) => info!(
                participant_id = %participant_id,
                session_id = %session_id,
                "Withdrew participant from superseded session"
            ),
            Err(e) => warn!(
                participant_id = %participant_id,
                session_id = %session_id,
                error = %e,
                "Participant left orphaned in superseded session"
            ),
        }
    }

    /// Marks the room ended, then removes every participant it held from its
    /// session.
    ///
    /// Removals run concurrently; individual failures are logged and counted
    /// but never fail the operation. Only an unknown room is an error. A room
    /// that was already ended reports nothing removed.
    #[instrument(skip(self))]
    pub async fn end_session(&self, room_name: &str) -> Result<EndedSession, AppError> {
        let room = match self.registry.mark_ended(room_name).await? {
            EndRoomResult::Ended(room) => room,
            EndRoomResult::AlreadyEnded(room) => {
                info!(
                    room = %room_name,
                    session_id = %room.session_id,
                    "Room/session was already ended"
                );
                return Ok(EndedSession {
                    room,
                    removed: 0,
                    failed: 0,
                });
            }
        };

        let removals = room.participants.iter().map(|participant_id| {
            self.platform
                .remove_participant_from_session(participant_id, &room.session_id)
        });
        let results = join_all(removals).await;

        let mut failed = 0;
        for (participant_id, result) in room.participants.iter().zip(&results) {
            if let Err(e) = result {
                failed += 1;
                warn!(
                    participant_id = %participant_id,
                    session_id = %room.session_id,
                    error = %e,
                    "Failed to remove participant from session"
                );
            }
        }
        let removed = results.len() - failed;

        info!(
            room = %room_name,
            session_id = %room.session_id,
            removed,
            failed,
            "Room/session ended"
        );

        Ok(EndedSession {
            room,
            removed,
            failed,
        })
    }
}
