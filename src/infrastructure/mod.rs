//! Adapters for PostgreSQL, Redis and Prometheus.

pub mod cache;
pub mod database;
pub mod metrics;
pub mod repositories;
