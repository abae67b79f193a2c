//! Unique identifier generation
//!
//! Session and event ids come from an injected generator. Generation
//! failure is fatal for any operation that needs a fresh id and must
//! propagate to the caller.

use uuid::Uuid;

use crate::error::BeaconResult;

/// Unique identifier source
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier
    fn generate(&self) -> BeaconResult<String>;
}

/// UUID v4 based identifier generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> BeaconResult<String> {
        Ok(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator_produces_unique_ids() {
        let ids = UuidGenerator;
        let a = ids.generate().unwrap();
        let b = ids.generate().unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
