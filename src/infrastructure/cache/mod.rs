//! Redis
//!
//! Only short-lived credentials live here: refresh tokens and password
//! reset tokens, both keyed by the SHA-256 of the token.

mod token_store;

pub use token_store::RedisTokenStore;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Open a reconnecting connection; fails fast if the first connect fails.
#[instrument(skip_all)]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    let manager = ConnectionManager::new(Client::open(settings.url.as_str())?).await?;
    info!("Connected to Redis");
    Ok(manager)
}

/// Key layout
pub mod keys {
    /// Prefix for refresh tokens (e.g., "refresh:sha256")
    pub const REFRESH_TOKEN: &str = "refresh:";

    /// Prefix for password reset tokens (e.g., "reset:sha256")
    pub const RESET_TOKEN: &str = "reset:";

    #[inline]
    pub fn refresh_token(token_hash: &str) -> String {
        format!("{}{}", REFRESH_TOKEN, token_hash)
    }

    #[inline]
    pub fn reset_token(token_hash: &str) -> String {
        format!("{}{}", RESET_TOKEN, token_hash)
    }
}
