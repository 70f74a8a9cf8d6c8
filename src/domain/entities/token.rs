//! Short-lived token storage.
//!
//! Refresh tokens and password reset tokens live outside the relational
//! store with a TTL; only their hashes are used as keys.

use async_trait::async_trait;

use super::member::Role;
use crate::shared::error::AppError;

/// What a stored refresh token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshGrant {
    pub member_id: i64,
    pub role: Role,
}

/// Storage for refresh and password-reset tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Remember a refresh token hash for `ttl_secs`.
    async fn save_refresh_token(
        &self,
        token_hash: &str,
        grant: RefreshGrant,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Remove and return the grant for a refresh token hash.
    async fn take_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshGrant>, AppError>;

    /// Remember a password reset token hash for `ttl_secs`.
    async fn save_reset_token(
        &self,
        token_hash: &str,
        member_id: i64,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Whether a reset token hash is still live, without consuming it.
    async fn reset_token_exists(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Remove and return the member a reset token was issued for.
    async fn take_reset_token(&self, token_hash: &str) -> Result<Option<i64>, AppError>;
}
