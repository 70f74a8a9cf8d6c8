//! HTTP surface.

pub mod http;
pub mod middleware;
