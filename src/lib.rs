//! # One Drink Today
//!
//! Backend for a social service around regional traditional drinks.
//! Members review drinks in tagged posts, follow tags to hear about new
//! posts, comment, and search by tag or drink name. They can also propose
//! new drinks for the catalog and report abusive posts; admins approve both.
//!
//! ```text
//! presentation/   axum routes, handlers, auth + CORS + tracing middleware
//! application/    services (one trait + generic impl each) and DTOs
//! domain/         entities, repository traits, CurrentMember
//! infrastructure/ PostgreSQL repositories, Redis token store, Prometheus
//! shared/         AppError, pagination, snowflake IDs, validation
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;
pub mod startup;
pub mod telemetry;
