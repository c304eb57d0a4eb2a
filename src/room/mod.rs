// Public API - what other modules can use
pub use models::{RoomModel, RoomStatus};
pub use repository::{EndRoomResult, InMemoryRoomRepository, RoomRepository};
pub use service::{session_tag, RoomRegistry};

// Internal modules
pub mod models;
pub mod repository;
mod service;
