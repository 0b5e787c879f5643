use crate::application_port::AuthError;
use std::time::Duration;

/// One live refresh token per subject, expiring after its TTL.
#[async_trait::async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert or replace the subject's token in a single write.
    async fn save(&self, subject: &str, token: &str, ttl: Duration) -> Result<(), AuthError>;
    async fn get(&self, subject: &str) -> Result<Option<String>, AuthError>;
    /// Returns whether an entry was removed.
    async fn delete(&self, subject: &str) -> Result<bool, AuthError>;
    async fn exists(&self, subject: &str) -> Result<bool, AuthError>;
}
