use super::ttl_millis;
use crate::application_port::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

pub struct RedisRefreshTokenStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRefreshTokenStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRefreshTokenStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, subject: &str) -> String {
        format!("{}:refresh:{}", self.prefix, subject)
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn save(&self, subject: &str, token: &str, ttl: Duration) -> Result<(), AuthError> {
        let key = self.key(subject);
        let mut conn = self.conn.clone();
        let _: () = conn
            .pset_ex(&key, token, ttl_millis(ttl))
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, subject: &str) -> Result<Option<String>, AuthError> {
        let key = self.key(subject);
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(val)
    }

    async fn delete(&self, subject: &str) -> Result<bool, AuthError> {
        let key = self.key(subject);
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(&key)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn exists(&self, subject: &str) -> Result<bool, AuthError> {
        let key = self.key(subject);
        let mut conn = self.conn.clone();
        let found: bool = conn
            .exists(&key)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(found)
    }
}
