//! DTO modules that bridge services with templates.

pub mod clients;
pub mod search;
