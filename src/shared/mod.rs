//! Cross-layer helpers.

pub mod error;
pub mod id;
pub mod pagination;
pub mod snowflake;
pub mod validation;
