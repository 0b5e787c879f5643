use super::ttl_millis;
use crate::application_port::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

pub struct RedisRevocationList {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRevocationList {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRevocationList {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, signature: &str) -> String {
        format!("{}:blacklist:{}", self.prefix, signature)
    }
}

#[async_trait::async_trait]
impl RevocationList for RedisRevocationList {
    async fn save(&self, signature: &str, subject: &str, ttl: Duration) -> Result<(), AuthError> {
        let key = self.key(signature);
        let mut conn = self.conn.clone();
        let _: () = conn
            .pset_ex(&key, subject, ttl_millis(ttl))
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn exists(&self, signature: &str) -> Result<bool, AuthError> {
        let key = self.key(signature);
        let mut conn = self.conn.clone();
        let found: bool = conn
            .exists(&key)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(found)
    }
}
