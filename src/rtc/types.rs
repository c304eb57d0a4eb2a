use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Media a participant is allowed to publish into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Permission {
    Audio,
    Video,
}

/// Builds the publish permission set for a participant.
/// Order is always AUDIO then VIDEO; an empty set is valid.
pub fn permissions_for(audio: bool, video: bool) -> Vec<Permission> {
    let mut permissions = Vec::new();
    if audio {
        permissions.push(Permission::Audio);
    }
    if video {
        permissions.push(Permission::Video);
    }
    permissions
}

/// A participant freshly created on the platform along with its join token
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedParticipant {
    pub participant_id: String,
    pub token: String,
}
