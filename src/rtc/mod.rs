// Boundary to the external real-time communications platform
pub use http::{HttpRtcPlatform, RtcCredentials, DEFAULT_API_URL};
pub use platform::{RtcError, RtcPlatform};
pub use types::{permissions_for, CreatedParticipant, Permission};

mod http;
mod platform;
mod types;
