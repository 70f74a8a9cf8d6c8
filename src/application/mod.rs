//! Use cases over the domain repositories.

pub mod dto;
pub mod services;
