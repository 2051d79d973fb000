//! TTL-aware cache of prior lookup results.
//!
//! Entries are upserted on every successful upstream resolution and never
//! proactively evicted; a stale entry is simply overwritten after the next
//! miss. Concurrent writers to the same key may race, last write wins.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::CanonicalRecord;

/// The two cacheable operations, each with its own freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Search,
    Detail,
}

impl CacheKind {
    pub fn ttl(self) -> Duration {
        match self {
            CacheKind::Search => Duration::from_secs(300),
            CacheKind::Detail => Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CachedPayload {
    Search(Vec<CanonicalRecord>),
    Detail(CanonicalRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unix seconds at write time.
    pub ts: i64,
    pub payload: CachedPayload,
}

impl CacheEntry {
    pub fn new(payload: CachedPayload) -> Self {
        Self {
            ts: chrono::Utc::now().timestamp(),
            payload,
        }
    }

    /// Read-only staleness check: age against the operation's TTL.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let age = chrono::Utc::now().timestamp() - self.ts;
        age < ttl.as_secs() as i64
    }
}

/// Minimal get/put contract over the backing store. [`MemoryStore`] is the
/// default; a durable key-value store can implement the same trait and be
/// injected through the application state.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, kind: CacheKind, key: &str) -> Option<CacheEntry>;

    /// Upsert with the current timestamp.
    async fn put(&self, kind: CacheKind, key: &str, payload: CachedPayload);

    /// Insert a pre-built entry, keeping its timestamp. Used to seed or
    /// back-date entries.
    async fn put_entry(&self, kind: CacheKind, key: &str, entry: CacheEntry);
}

/// In-process store backed by a concurrent map. Per-key overwrite is atomic;
/// there is no cross-key locking.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<(CacheKind, String), CacheEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, kind: CacheKind, key: &str) -> Option<CacheEntry> {
        self.entries
            .get(&(kind, key.to_string()))
            .map(|e| e.value().clone())
    }

    async fn put(&self, kind: CacheKind, key: &str, payload: CachedPayload) {
        self.entries
            .insert((kind, key.to_string()), CacheEntry::new(payload));
    }

    async fn put_entry(&self, kind: CacheKind, key: &str, entry: CacheEntry) {
        self.entries.insert((kind, key.to_string()), entry);
    }
}
