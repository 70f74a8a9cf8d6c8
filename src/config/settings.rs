//! Typed settings tree.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Everything the service reads at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    /// Refresh and reset token storage
    pub redis: RedisSettings,
    pub jwt: JwtSettings,
    pub password_reset: PasswordResetSettings,
    pub snowflake: SnowflakeSettings,
    pub cors: CorsSettings,
    /// `RUN_ENV`, `development` when unset
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// PostgreSQL pool sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a free connection
    pub acquire_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub url: String,
}

/// Access tokens are HS256 JWTs; refresh tokens are opaque and live in Redis.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// At least [`MIN_JWT_SECRET_LENGTH`] bytes
    pub secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetSettings {
    pub token_ttl_minutes: u64,
    /// Base of the link handed to the member; `?token=` is appended
    pub reset_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Unique per running instance, 0-1023
    pub worker_id: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Read the layered configuration.
    ///
    /// Later sources win: built-in defaults, `config/default.toml`,
    /// `config/{RUN_ENV}.toml`, `APP__*` variables, then the plain
    /// variables below.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());
        let plain = |name: &str| std::env::var(name).ok();

        let config = Config::builder()
            .set_default("environment", environment.as_str())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("jwt.access_token_expiry_minutes", 30)?
            .set_default("jwt.refresh_token_expiry_days", 14)?
            .set_default("password_reset.token_ttl_minutes", 30)?
            .set_default(
                "password_reset.reset_url",
                "http://localhost:8080/api/members/password-reset",
            )?
            .set_default("snowflake.worker_id", 1)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__JWT__SECRET -> jwt.secret
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", plain("SERVER_HOST"))?
            .set_override_option("server.port", plain("SERVER_PORT"))?
            .set_override_option("database.url", plain("DATABASE_URL"))?
            .set_override_option("redis.url", plain("REDIS_URL"))?
            .set_override_option("jwt.secret", plain("JWT_SECRET"))?
            .set_override_option("snowflake.worker_id", plain("SNOWFLAKE_WORKER_ID"))?
            .build()?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.jwt.secret.len();
        if len < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret is {} bytes, at least {} are required",
                len, MIN_JWT_SECRET_LENGTH
            )));
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl JwtSettings {
    /// Refresh token lifetime in seconds.
    pub fn refresh_token_ttl_secs(&self) -> u64 {
        (self.refresh_token_expiry_days.max(0) as u64) * 24 * 60 * 60
    }
}

impl PasswordResetSettings {
    /// Reset token lifetime in seconds.
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_minutes * 60
    }

    /// Link that carries `token`.
    pub fn link_for(&self, token: &str) -> String {
        format!("{}?token={}", self.reset_url, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(secret: &str) -> JwtSettings {
        JwtSettings {
            secret: secret.into(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 14,
        }
    }

    fn settings_with_secret(secret: &str) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            database: DatabaseSettings {
                url: "postgres://localhost/one_drink".into(),
                max_connections: 5,
                min_connections: 1,
                acquire_timeout: 5,
            },
            redis: RedisSettings {
                url: "redis://localhost:6379".into(),
            },
            jwt: jwt(secret),
            password_reset: PasswordResetSettings {
                token_ttl_minutes: 30,
                reset_url: "http://localhost/reset".into(),
            },
            snowflake: SnowflakeSettings { worker_id: 1 },
            cors: CorsSettings {
                allowed_origins: vec![],
            },
            environment: "test".into(),
        }
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        assert!(settings_with_secret("short").validate().is_err());
        let secret = "x".repeat(MIN_JWT_SECRET_LENGTH);
        assert!(settings_with_secret(&secret).validate().is_ok());
    }

    #[test]
    fn test_refresh_ttl_in_seconds() {
        assert_eq!(jwt("s").refresh_token_ttl_secs(), 14 * 86_400);
    }

    #[test]
    fn test_reset_link_carries_token() {
        let settings = settings_with_secret("s");
        assert_eq!(
            settings.password_reset.link_for("abc"),
            "http://localhost/reset?token=abc"
        );
        assert_eq!(settings.password_reset.token_ttl_secs(), 1800);
        assert_eq!(settings.server_addr(), "127.0.0.1:8080");
    }
}
