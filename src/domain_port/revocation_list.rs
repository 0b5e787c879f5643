use crate::application_port::AuthError;
use std::time::Duration;

/// Signatures of tokens invalidated before their natural expiry.
#[async_trait::async_trait]
pub trait RevocationList: Send + Sync {
    /// `subject` is kept as the entry value for auditing.
    async fn save(&self, signature: &str, subject: &str, ttl: Duration) -> Result<(), AuthError>;
    async fn exists(&self, signature: &str) -> Result<bool, AuthError>;
}
