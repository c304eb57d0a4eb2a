// Library crate for the room call service
// This file exposes the public API for the binary and integration tests

pub mod call;
pub mod config;
pub mod room;
pub mod routes;
pub mod rtc;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use call::{CallService, TagGenerator, UuidTagGenerator};
pub use config::AppConfig;
pub use room::{InMemoryRoomRepository, RoomModel, RoomRegistry, RoomRepository, RoomStatus};
pub use rtc::{HttpRtcPlatform, Permission, RtcCredentials, RtcError, RtcPlatform};
pub use shared::{ApiFailure, AppError, AppState};
