//! Client-facing record shape and its sentinel values.

use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const NO_DESCRIPTION: &str = "No description available.";
/// Title served for identifiers outside the addressable namespace.
pub const GENERIC_TITLE: &str = "Book";

/// Normalized representation of a work, independent of upstream schema
/// quirks. Every field is always serialized; absence is an empty string or a
/// sentinel, never a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub cover: String,
    pub tags: Vec<String>,
    pub desc: String,
}

impl CanonicalRecord {
    /// Minimal synthetic record for identifiers that are not work keys.
    pub fn degraded(id: String) -> Self {
        Self {
            id,
            title: GENERIC_TITLE.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            year: String::new(),
            cover: String::new(),
            tags: Vec::new(),
            desc: NO_DESCRIPTION.to_string(),
        }
    }
}
