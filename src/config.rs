use std::env;
use std::time::Duration;

use crate::openlibrary;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub openlibrary_url: String,
    pub upstream_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            openlibrary_url: env::var("OPENLIBRARY_URL")
                .unwrap_or_else(|_| openlibrary::DEFAULT_BASE_URL.to_string()),
            upstream_timeout: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(openlibrary::DEFAULT_TIMEOUT),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
        }
    }
}
