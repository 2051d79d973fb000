//! OpenLibrary client: the three upstream queries and their raw document
//! shapes.
//!
//! Timeouts and non-2xx responses fail the whole call; there are no retries
//! and no partial results. Whether a failed call is fatal is decided by the
//! caller (the primary work fetch is, the editions fallback is not).

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const SEARCH_LIMIT: u32 = 24;
pub const EDITIONS_LIMIT: u32 = 5;

const USER_AGENT: &str = concat!("ink-books/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum UpstreamError {
    /// The call exceeded its timeout.
    Timeout,
    /// Upstream answered with a non-success status.
    Status(u16),
    /// Transport-level failure (connect, DNS, ...).
    Network(String),
    /// Response body not parseable as the expected structure.
    Malformed(String),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Timeout => write!(f, "Upstream request timed out"),
            UpstreamError::Status(code) => write!(f, "Upstream returned status {}", code),
            UpstreamError::Network(msg) => write!(f, "Upstream request failed: {}", msg),
            UpstreamError::Malformed(msg) => write!(f, "Failed to parse upstream response: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if let Some(status) = e.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Network(e.to_string())
        }
    }
}

/// Shared upstream client. One reqwest client per process, injected into the
/// application state; the base URL is swapped for a mock server in tests.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Full-text search, capped at [`SEARCH_LIMIT`] documents.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchDoc>, UpstreamError> {
        let url = format!(
            "{}/search.json?q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            SEARCH_LIMIT
        );
        let resp: SearchResponse = self.get_json(&url).await?;
        Ok(resp.docs)
    }

    /// Fetch one work document by its normalized key (`/works/OL...W`).
    pub async fn fetch_work(&self, work_key: &str) -> Result<WorkDoc, UpstreamError> {
        let url = format!("{}{}.json", self.base_url, work_key);
        self.get_json(&url).await
    }

    /// List up to `limit` editions of a work.
    pub async fn fetch_editions(
        &self,
        work_key: &str,
        limit: u32,
    ) -> Result<Vec<EditionDoc>, UpstreamError> {
        let url = format!("{}{}/editions.json?limit={}", self.base_url, work_key, limit);
        let resp: EditionsResponse = self.get_json(&url).await?;
        Ok(resp.entries)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| UpstreamError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<i64>,
    pub cover_i: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WorkDoc {
    pub title: Option<String>,
    pub description: Option<Description>,
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EditionsResponse {
    #[serde(default)]
    entries: Vec<EditionDoc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditionDoc {
    pub description: Option<Description>,
    pub notes: Option<Description>,
    pub subtitle: Option<String>,
}

/// OpenLibrary serves free-text fields either as a bare string or as a
/// `{"type": "/type/text", "value": ...}` object. Both forms collapse to
/// plain text through this one extraction point.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed {
        #[serde(default)]
        value: String,
    },
}

impl Description {
    pub fn text(&self) -> &str {
        match self {
            Description::Text(s) => s,
            Description::Typed { value } => value,
        }
    }
}
