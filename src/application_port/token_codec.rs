use super::AuthError;
use crate::domain_model::{Claims, TokenCategory};
use chrono::{DateTime, Duration, Utc};

#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    async fn issue(
        &self,
        category: TokenCategory,
        subject: &str,
        role: &str,
        ttl: Duration,
    ) -> Result<String, AuthError>;

    /// Checks signature and expiry; both always run.
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;

    async fn category(&self, token: &str) -> Result<TokenCategory, AuthError> {
        Ok(self.verify(token).await?.category)
    }

    async fn subject(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.verify(token).await?.sub)
    }

    async fn role(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.verify(token).await?.role)
    }

    async fn expiration(&self, token: &str) -> Result<DateTime<Utc>, AuthError> {
        Ok(self.verify(token).await?.expires_at())
    }
}
