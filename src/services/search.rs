//! Search operation: cache-first lookup plus the pure aggregation transform
//! from raw search documents to canonical records.

use crate::cache::{CacheKind, CachedPayload};
use crate::models::{CanonicalRecord, UNKNOWN_AUTHOR, UNTITLED};
use crate::openlibrary::{SearchDoc, UpstreamError};
use crate::state::AppState;
use crate::text::{cover_url, non_empty_or, normalize_opt};

/// Cached full-text search. An empty query short-circuits to an empty list
/// without touching cache or upstream.
pub async fn search(state: &AppState, query: &str) -> Result<Vec<CanonicalRecord>, UpstreamError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(entry) = state.cache.get(CacheKind::Search, query).await {
        if entry.is_fresh(CacheKind::Search.ttl()) {
            if let CachedPayload::Search(records) = entry.payload {
                tracing::debug!(query, "search cache hit");
                return Ok(records);
            }
        }
    }

    tracing::debug!(query, "search cache miss");
    let docs = state.client.search(query).await?;
    let records = aggregate(&docs);
    state
        .cache
        .put(CacheKind::Search, query, CachedPayload::Search(records.clone()))
        .await;
    Ok(records)
}

/// Map raw search documents to canonical records, preserving input order.
///
/// Documents without a provider key get synthetic ids `id_0`, `id_1`, ...
/// numbered by how many synthetic ids were already handed out in this
/// response, which keeps the suffix stable when keyed and unkeyed documents
/// interleave.
pub fn aggregate(docs: &[SearchDoc]) -> Vec<CanonicalRecord> {
    let mut records = Vec::with_capacity(docs.len());
    let mut synthetic = 0usize;

    for doc in docs {
        let id = match doc.key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                let id = format!("id_{}", synthetic);
                synthetic += 1;
                id
            }
        };

        let title = non_empty_or(normalize_opt(doc.title.as_deref()), UNTITLED);
        let author = non_empty_or(
            normalize_opt(doc.author_name.as_ref().and_then(|a| a.first()).map(String::as_str)),
            UNKNOWN_AUTHOR,
        );
        let year = doc
            .first_publish_year
            .map(|y| y.to_string())
            .unwrap_or_default();
        let cover = cover_url(doc.cover_i, 'L').unwrap_or_default();
        let tags = if year.is_empty() {
            Vec::new()
        } else {
            vec![year.clone()]
        };

        records.push(CanonicalRecord {
            id,
            title,
            author,
            year,
            cover,
            tags,
            // Search results never carry a description; the detail path
            // resolves it.
            desc: String::new(),
        });
    }

    records
}
