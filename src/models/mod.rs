//! Models backing the HTTP layer: session user and configuration.

pub mod auth;
pub mod config;
