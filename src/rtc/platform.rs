use async_trait::async_trait;
use thiserror::Error;

use super::types::{CreatedParticipant, Permission};

/// Failure talking to the communications platform
#[derive(Error, Debug)]
pub enum RtcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("platform returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// The operations this service consumes from the real-time communications platform.
///
/// Every call is scoped to the account the implementation was configured with.
#[async_trait]
pub trait RtcPlatform: Send + Sync {
    /// Creates a new session tagged with `tag`, returning its id
    async fn create_session(&self, tag: &str) -> Result<String, RtcError>;

    /// Creates a participant with the given publish permissions
    async fn create_participant(
        &self,
        tag: &str,
        permissions: &[Permission],
    ) -> Result<CreatedParticipant, RtcError>;

    async fn add_participant_to_session(
        &self,
        session_id: &str,
        participant_id: &str,
    ) -> Result<(), RtcError>;

    async fn remove_participant_from_session(
        &self,
        participant_id: &str,
        session_id: &str,
    ) -> Result<(), RtcError>;
}
