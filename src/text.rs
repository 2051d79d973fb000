//! Text cleanup and URL helpers shared by the search aggregator and the
//! detail resolver.

const COVERS_BASE: &str = "https://covers.openlibrary.org";

/// Strip the Unicode replacement character and surrounding whitespace.
pub fn normalize(s: &str) -> String {
    s.replace('\u{FFFD}', "").trim().to_string()
}

/// Like [`normalize`] but tolerates an absent value.
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}

/// Substitute a sentinel for an empty string.
pub fn non_empty_or(s: String, fallback: &str) -> String {
    if s.is_empty() { fallback.to_string() } else { s }
}

/// Deterministic cover image URL for a cover identifier. A missing or
/// non-positive identifier yields `None`; callers serve absence as an empty
/// string, never a placeholder image.
pub fn cover_url(cover_id: Option<i64>, size: char) -> Option<String> {
    match cover_id {
        Some(id) if id > 0 => Some(format!("{COVERS_BASE}/b/id/{id}-{size}.jpg")),
        _ => None,
    }
}

/// Canonical form of a work identifier: a single leading path separator.
pub fn normalize_work_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Whether a normalized key lies inside the addressable /works/ namespace.
pub fn is_works_key(key: &str) -> bool {
    key.starts_with("/works/")
}
