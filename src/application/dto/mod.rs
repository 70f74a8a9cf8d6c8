//! Wire types. JSON fields are camelCase; IDs leave as strings.

pub mod request;
pub mod response;
