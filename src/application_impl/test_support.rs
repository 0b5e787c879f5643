//! Shared doubles for the pipeline and reissue tests.

use super::{JwtHs256Codec, SessionPolicy};
use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::TokenCategory;
use crate::domain_port::{RefreshTokenStore, RevocationList};
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Barrier;

pub fn test_codec() -> JwtHs256Codec {
    JwtHs256Codec::new(b"test-signing-key-0123456789abcdef")
}

pub fn test_policy() -> SessionPolicy {
    SessionPolicy {
        store_timeout: std::time::Duration::from_millis(50),
        ..SessionPolicy::default()
    }
}

pub async fn refresh_for(codec: &dyn TokenCodec, subject: &str, ttl: Duration) -> String {
    codec
        .issue(TokenCategory::Refresh, subject, "ROLE_MEMBER", ttl)
        .await
        .unwrap()
}

/// Holds every `get` until `parties` callers have read.
pub struct GatedStore {
    inner: Arc<dyn RefreshTokenStore>,
    barrier: Barrier,
}

impl GatedStore {
    pub fn new(inner: Arc<dyn RefreshTokenStore>, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for GatedStore {
    async fn save(&self, subject: &str, token: &str, ttl: std::time::Duration) -> Result<(), AuthError> {
        self.inner.save(subject, token, ttl).await
    }

    async fn get(&self, subject: &str) -> Result<Option<String>, AuthError> {
        let value = self.inner.get(subject).await?;
        self.barrier.wait().await;
        Ok(value)
    }

    async fn delete(&self, subject: &str) -> Result<bool, AuthError> {
        self.inner.delete(subject).await
    }

    async fn exists(&self, subject: &str) -> Result<bool, AuthError> {
        self.inner.exists(subject).await
    }
}

/// Never answers.
pub struct HangingStore;

#[async_trait::async_trait]
impl RefreshTokenStore for HangingStore {
    async fn save(&self, _: &str, _: &str, _: std::time::Duration) -> Result<(), AuthError> {
        std::future::pending().await
    }

    async fn get(&self, _: &str) -> Result<Option<String>, AuthError> {
        std::future::pending().await
    }

    async fn delete(&self, _: &str) -> Result<bool, AuthError> {
        std::future::pending().await
    }

    async fn exists(&self, _: &str) -> Result<bool, AuthError> {
        std::future::pending().await
    }
}

#[async_trait::async_trait]
impl RevocationList for HangingStore {
    async fn save(&self, _: &str, _: &str, _: std::time::Duration) -> Result<(), AuthError> {
        std::future::pending().await
    }

    async fn exists(&self, _: &str) -> Result<bool, AuthError> {
        std::future::pending().await
    }
}

/// Answers every call with a connection error.
pub struct FailingStore;

fn refused() -> AuthError {
    AuthError::StoreUnavailable("connection refused".to_string())
}

#[async_trait::async_trait]
impl RefreshTokenStore for FailingStore {
    async fn save(&self, _: &str, _: &str, _: std::time::Duration) -> Result<(), AuthError> {
        Err(refused())
    }

    async fn get(&self, _: &str) -> Result<Option<String>, AuthError> {
        Err(refused())
    }

    async fn delete(&self, _: &str) -> Result<bool, AuthError> {
        Err(refused())
    }

    async fn exists(&self, _: &str) -> Result<bool, AuthError> {
        Err(refused())
    }
}

#[async_trait::async_trait]
impl RevocationList for FailingStore {
    async fn save(&self, _: &str, _: &str, _: std::time::Duration) -> Result<(), AuthError> {
        Err(refused())
    }

    async fn exists(&self, _: &str) -> Result<bool, AuthError> {
        Err(refused())
    }
}

/// Reads succeed with nothing revoked; writes fail.
pub struct UnwritableRevocationList;

#[async_trait::async_trait]
impl RevocationList for UnwritableRevocationList {
    async fn save(&self, _: &str, _: &str, _: std::time::Duration) -> Result<(), AuthError> {
        Err(refused())
    }

    async fn exists(&self, _: &str) -> Result<bool, AuthError> {
        Ok(false)
    }
}
