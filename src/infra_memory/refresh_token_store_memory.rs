use super::TtlMap;
use crate::application_port::*;
use crate::domain_port::*;
use std::time::Duration;

#[derive(Default)]
pub struct MemoryRefreshTokenStore {
    entries: TtlMap,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn save(&self, subject: &str, token: &str, ttl: Duration) -> Result<(), AuthError> {
        self.entries.insert(subject, token, ttl);
        Ok(())
    }

    async fn get(&self, subject: &str) -> Result<Option<String>, AuthError> {
        Ok(self.entries.get(subject))
    }

    async fn delete(&self, subject: &str) -> Result<bool, AuthError> {
        Ok(self.entries.remove(subject))
    }

    async fn exists(&self, subject: &str) -> Result<bool, AuthError> {
        Ok(self.entries.contains(subject))
    }
}
