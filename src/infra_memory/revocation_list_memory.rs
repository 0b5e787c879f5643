use super::TtlMap;
use crate::application_port::*;
use crate::domain_port::*;
use std::time::Duration;

#[derive(Default)]
pub struct MemoryRevocationList {
    entries: TtlMap,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subject recorded for a revoked signature.
    pub fn subject_of(&self, signature: &str) -> Option<String> {
        self.entries.get(signature)
    }
}

#[async_trait::async_trait]
impl RevocationList for MemoryRevocationList {
    async fn save(&self, signature: &str, subject: &str, ttl: Duration) -> Result<(), AuthError> {
        self.entries.insert(signature, subject, ttl);
        Ok(())
    }

    async fn exists(&self, signature: &str) -> Result<bool, AuthError> {
        Ok(self.entries.contains(signature))
    }
}
