// Public API - what other modules can use
pub use generators::{TagGenerator, UuidTagGenerator};
pub use handlers::{end_session, join_call};
pub use service::{CallService, EndedSession, JoinedCall};
pub use types::{
    EndSessionResponse, JoinCallRequest, JoinCallResponse, DEFAULT_ROOM, END_FAILED_MESSAGE,
    JOIN_FAILED_MESSAGE,
};

// Internal modules
mod generators;
mod handlers;
mod service;
mod types;
