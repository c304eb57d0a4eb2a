pub mod fake_vendor;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use fake_vendor::{FakeVendor, Operation, ReceivedRequest};
#[allow(unused_imports)]
pub use setup::TestApp;
