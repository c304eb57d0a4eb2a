use uuid::Uuid;

/// Trait for generating participant correlation tags.
/// Tags are sent to the platform, so they must never carry personal data.
pub trait TagGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID-based tag generator
pub struct UuidTagGenerator;

impl UuidTagGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UuidTagGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TagGenerator for UuidTagGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
