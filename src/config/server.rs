//! # Server Configuration Loader
//!
//! Env-driven configuration for the echo endpoint, loaded once at startup.
//! Non-production environments (`APP_ENV` other than `"production"`) get
//! dotenv loading first: a custom `DOTENV_FILE` path when set, otherwise
//! `.env.{APP_ENV}` with a fallback to `.env`.
//!
//! | Variable | Description | Default |
//! |-----------|-------------|---------|
//! | `APP_ENV` | Current environment | `"development"` |
//! | `DOTENV_FILE` | Optional custom dotenv path | *none* |
//! | `UPLOAD_ROOT` | Root directory for received uploads | `./uploads` |
//! | `HTTP_MAX_BODY_BYTES` | Max request body (bytes) | derived from MB |
//! | `HTTP_MAX_BODY_MB` | Max request body (MB, if bytes unset) | `5` |

use std::env;
use std::path::PathBuf;

use crate::config::env::read_u64;

/// Configuration for the echo server.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Root directory received uploads are written under.
    pub upload_root: PathBuf,
    /// Request-body cap handed to the router.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        if app_env != "production" {
            if let Ok(path) = env::var("DOTENV_FILE") {
                let _ = dotenvy::from_filename(path);
            } else {
                let candidate = format!(".env.{app_env}");
                dotenvy::from_filename(&candidate)
                    .or_else(|_| dotenvy::dotenv())
                    .ok();
            }
        }

        let max_body_bytes = env::var("HTTP_MAX_BODY_BYTES")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or_else(|| (read_u64("HTTP_MAX_BODY_MB", 5) as usize) * 1024 * 1024);

        let upload_root =
            PathBuf::from(env::var("UPLOAD_ROOT").unwrap_or_else(|_| "./uploads".into()));

        ServerConfig {
            upload_root,
            max_body_bytes,
        }
    }
}
