//! # Environment Variable Utilities
//!
//! Numeric env parsing with fallback defaults, used by
//! [`crate::config::server::ServerConfig`]. The provider-injected variant
//! exists so tests can run without touching the process environment.

/// Reads a `u64` from an environment variable, falling back to `default`
/// when unset or unparsable.
pub fn read_u64(name: &str, default: u64) -> u64 {
    read_u64_from(|k| std::env::var(k).ok(), name, default)
}

/// Reads a `u64` using a custom provider function.
pub fn read_u64_from<F>(provider: F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').parse::<u64>().ok())
        .unwrap_or(default)
}
