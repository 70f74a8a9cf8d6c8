//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod comment;
pub mod declaration;
pub mod drink;
pub mod health;
pub mod member;
pub mod notification;
pub mod post;
pub mod registration;
pub mod search;
pub mod tag;
