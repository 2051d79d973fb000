//! Detail operation: cached work resolution with the multi-source
//! description fallback chain.

use crate::cache::{CacheKind, CachedPayload};
use crate::models::{CanonicalRecord, NO_DESCRIPTION, UNKNOWN_AUTHOR, UNTITLED};
use crate::openlibrary::{EDITIONS_LIMIT, EditionDoc, OpenLibraryClient, UpstreamError};
use crate::state::AppState;
use crate::text::{cover_url, is_works_key, non_empty_or, normalize, normalize_opt, normalize_work_key};

/// Cached detail lookup. Identifiers outside /works/ are answered with a
/// minimal synthetic record: no upstream call, no cache entry.
pub async fn detail(state: &AppState, raw_id: &str) -> Result<CanonicalRecord, UpstreamError> {
    let work_key = normalize_work_key(raw_id);

    if !is_works_key(&work_key) {
        return Ok(CanonicalRecord::degraded(work_key));
    }

    if let Some(entry) = state.cache.get(CacheKind::Detail, &work_key).await {
        if entry.is_fresh(CacheKind::Detail.ttl()) {
            if let CachedPayload::Detail(record) = entry.payload {
                tracing::debug!(%work_key, "detail cache hit");
                return Ok(record);
            }
        }
    }

    tracing::debug!(%work_key, "detail cache miss");
    let record = resolve(&state.client, &work_key).await?;
    state
        .cache
        .put(CacheKind::Detail, &work_key, CachedPayload::Detail(record.clone()))
        .await;
    Ok(record)
}

/// Fetch and normalize one work. Fails only when the primary work fetch
/// fails; a missing description is never an error.
pub async fn resolve(
    client: &OpenLibraryClient,
    work_key: &str,
) -> Result<CanonicalRecord, UpstreamError> {
    let work = client.fetch_work(work_key).await?;

    let title = non_empty_or(normalize_opt(work.title.as_deref()), UNTITLED);
    let cover = cover_url(work.covers.first().copied(), 'L').unwrap_or_default();
    let tags: Vec<String> = work
        .subjects
        .iter()
        .take(8)
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();

    let mut desc = work
        .description
        .as_ref()
        .map(|d| normalize(d.text()))
        .unwrap_or_default();

    // Many works carry no description of their own while some of their
    // editions do. A failed editions fetch degrades to the sentinel below,
    // never to a caller-visible error.
    if desc.is_empty() {
        match client.fetch_editions(work_key, EDITIONS_LIMIT).await {
            Ok(entries) => {
                if let Some(found) = edition_description(&entries) {
                    desc = found;
                }
            }
            Err(e) => {
                tracing::warn!(work_key, error = %e, "editions fallback failed, serving without description");
            }
        }
    }

    Ok(CanonicalRecord {
        id: work_key.to_string(),
        title,
        // The work document carries neither author nor year; search results
        // do, and callers keep those from search time.
        author: UNKNOWN_AUTHOR.to_string(),
        year: String::new(),
        cover,
        tags,
        desc: non_empty_or(desc, NO_DESCRIPTION),
    })
}

/// First non-empty candidate over the editions, in provider order. Within an
/// edition the field priority is description, then notes, then subtitle; the
/// first edition yielding any candidate ends the scan.
fn edition_description(entries: &[EditionDoc]) -> Option<String> {
    for edition in entries {
        let mut candidate = edition
            .description
            .as_ref()
            .map(|d| normalize(d.text()))
            .unwrap_or_default();
        if candidate.is_empty() {
            candidate = edition
                .notes
                .as_ref()
                .map(|n| normalize(n.text()))
                .unwrap_or_default();
        }
        if candidate.is_empty() {
            candidate = normalize_opt(edition.subtitle.as_deref());
        }
        if !candidate.is_empty() {
            return Some(candidate);
        }
    }
    None
}
