//! HTTP Layer
//!
//! REST handlers and route configuration.

pub mod handlers;
pub mod routes;
