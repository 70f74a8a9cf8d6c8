//! Domain layer
//!
//! Entities, the repository traits the infrastructure layer implements,
//! and the caller identity ([`CurrentMember`]) threaded through services.
//! Nothing here depends on axum, sqlx or redis.

pub mod entities;

pub use entities::*;
