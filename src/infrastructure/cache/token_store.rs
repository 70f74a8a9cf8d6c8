//! Redis Token Store
//!
//! Refresh and password reset tokens keyed by their SHA-256 hash, each
//! stored with a TTL. Taking a token deletes it, so every token is
//! single-use.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use super::keys;
use crate::domain::{RefreshGrant, Role, TokenStore};
use crate::shared::error::AppError;

/// Refresh grant as stored in Redis
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedGrant {
    member_id: i64,
    role: Role,
}

/// Redis-backed [`TokenStore`]
#[derive(Clone)]
pub struct RedisTokenStore {
    redis: ConnectionManager,
}

impl RedisTokenStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Atomically read and delete a key.
    async fn take(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.redis.clone();
        let value: Option<String> = redis::cmd("GETDEL").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn save_refresh_token(
        &self,
        token_hash: &str,
        grant: RefreshGrant,
        ttl_secs: u64,
    ) -> Result<(), AppError> {
        let value = serde_json::to_string(&CachedGrant {
            member_id: grant.member_id,
            role: grant.role,
        })
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(keys::refresh_token(token_hash), value, ttl_secs)
            .await?;

        Ok(())
    }

    async fn take_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshGrant>, AppError> {
        match self.take(&keys::refresh_token(token_hash)).await? {
            Some(json) => {
                let cached: CachedGrant = serde_json::from_str(&json)
                    .map_err(|e| AppError::Internal(format!("Deserialization error: {}", e)))?;
                Ok(Some(RefreshGrant {
                    member_id: cached.member_id,
                    role: cached.role,
                }))
            }
            None => Ok(None),
        }
    }

    async fn save_reset_token(
        &self,
        token_hash: &str,
        member_id: i64,
        ttl_secs: u64,
    ) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(keys::reset_token(token_hash), member_id, ttl_secs)
            .await?;

        Ok(())
    }

    async fn reset_token_exists(&self, token_hash: &str) -> Result<bool, AppError> {
        let mut conn = self.redis.clone();
        let exists: bool = conn.exists(keys::reset_token(token_hash)).await?;
        Ok(exists)
    }

    async fn take_reset_token(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        match self.take(&keys::reset_token(token_hash)).await? {
            Some(value) => value
                .parse::<i64>()
                .map(Some)
                .map_err(|e| AppError::Internal(format!("Corrupt reset token entry: {}", e))),
            None => Ok(None),
        }
    }
}
