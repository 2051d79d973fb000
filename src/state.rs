//! Application state shared across all handlers.
//!
//! The upstream client and the cache store are constructed once by the
//! process entry point and injected here; handlers never build their own.

use std::sync::Arc;

use crate::cache::{CacheStore, MemoryStore};
use crate::config::Config;
use crate::openlibrary::OpenLibraryClient;

#[derive(Clone)]
pub struct AppState {
    pub client: OpenLibraryClient,
    pub cache: Arc<dyn CacheStore>,
}

impl AppState {
    pub fn new(client: OpenLibraryClient, cache: Arc<dyn CacheStore>) -> Self {
        Self { client, cache }
    }

    /// Default wiring: configured upstream client plus the in-memory store.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let client = OpenLibraryClient::new(&config.openlibrary_url, config.upstream_timeout)?;
        Ok(Self::new(client, Arc::new(MemoryStore::new())))
    }
}
