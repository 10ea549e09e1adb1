//! Search categories, request values, and upstream error definitions.

use std::fmt;
use std::str::FromStr;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the upstream search domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    Code,
    Commits,
    Issues,
    Labels,
    Repositories,
    Topics,
    Users,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 7] = [
        SearchCategory::Code,
        SearchCategory::Commits,
        SearchCategory::Issues,
        SearchCategory::Labels,
        SearchCategory::Repositories,
        SearchCategory::Topics,
        SearchCategory::Users,
    ];

    /// Path segment used both inbound and upstream.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchCategory::Code => "code",
            SearchCategory::Commits => "commits",
            SearchCategory::Issues => "issues",
            SearchCategory::Labels => "labels",
            SearchCategory::Repositories => "repositories",
            SearchCategory::Topics => "topics",
            SearchCategory::Users => "users",
        }
    }

    /// Query used when the caller sends no body.
    pub fn default_query(self) -> &'static str {
        match self {
            SearchCategory::Code => "FastAPI filename:main.py",
            SearchCategory::Commits => "fix bug repo:openai/gpt-3",
            SearchCategory::Issues => "bug label:bug",
            SearchCategory::Labels => "bug repo:openai/gpt-3",
            SearchCategory::Repositories => "FastAPI stars:>1000",
            SearchCategory::Topics => "machine-learning",
            SearchCategory::Users => "ruvnet",
        }
    }

    /// Whether results are re-serialized into a chunked stream.
    ///
    /// Only issue search does this today. The other categories answer with a
    /// single JSON document.
    pub fn paginates(self) -> bool {
        matches!(self, SearchCategory::Issues)
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for SearchCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Inbound JSON body: `{query, page?, per_page?}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchBody {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Reasons a [`SearchRequest`] cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("page must be at least 1")]
    ZeroPage,
    #[error("per_page must be at least 1")]
    ZeroPerPage,
}

/// A validated search: non-empty query, `page >= 1`, `per_page >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    page: u32,
    per_page: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, page: u32, per_page: u32) -> Result<Self, InvalidRequest> {
        let query = query.into();
        if query.is_empty() {
            return Err(InvalidRequest::EmptyQuery);
        }
        if page == 0 {
            return Err(InvalidRequest::ZeroPage);
        }
        if per_page == 0 {
            return Err(InvalidRequest::ZeroPerPage);
        }
        Ok(Self {
            query,
            page,
            per_page,
        })
    }

    /// The request sent when a caller omits the body entirely.
    pub fn default_for(category: SearchCategory, per_page: u32) -> Self {
        Self {
            query: category.default_query().to_string(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Fill in defaults for omitted fields and validate.
    pub fn from_body(body: SearchBody, default_per_page: u32) -> Result<Self, InvalidRequest> {
        Self::new(
            body.query,
            body.page.unwrap_or(1),
            body.per_page.unwrap_or(default_per_page),
        )
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

/// Errors from the single outbound call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The remote answered with a non-200 status. Relayed verbatim.
    #[error("upstream returned {status}")]
    Status {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 response whose body is not JSON.
    #[error("upstream returned invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The configured credentials cannot be sent as a header.
    #[error("invalid upstream header: {0}")]
    InvalidHeader(String),
}

impl UpstreamError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Status { .. } => "status",
            UpstreamError::Transport(e) if e.is_timeout() => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::InvalidJson(_) => "invalid_json",
            UpstreamError::InvalidHeader(_) => "invalid_header",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
