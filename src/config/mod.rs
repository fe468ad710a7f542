//! Env-driven configuration for the server side of the crate.

pub mod env;
pub mod server;
