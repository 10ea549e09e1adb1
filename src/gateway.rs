//! Search gateway: one parametric operation for every search category.
//!
//! ```text
//! credential → Authorizer ──✗──▶ 403, upstream untouched
//!                 │
//!                 ▼
//! body (or category default) → SearchRequest → UpstreamClient
//!                                                  │
//!                       category.paginates()? ─────┤
//!                          yes: ChunkStream        no: JSON value
//! ```

use serde_json::Value;

use crate::config::ProxyConfig;
use crate::pagination::{paginate, ChunkStream, PaginationError};
use crate::security::{AuthError, Authorizer};
use crate::upstream::{
    InvalidRequest, SearchBody, SearchCategory, SearchRequest, UpstreamClient, UpstreamError,
};

/// Everything that can stop a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("invalid search request: {0}")]
    InvalidRequest(#[from] InvalidRequest),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

/// Successful gateway output.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Upstream JSON, passed through as one document.
    Json(Value),
    /// Upstream JSON re-serialized into ordered chunks.
    Chunked(ChunkStream),
}

/// Authorizer + upstream client + per-call settings.
#[derive(Debug, Clone)]
pub struct Gateway {
    authorizer: Authorizer,
    upstream: UpstreamClient,
    default_per_page: u32,
    char_limit: usize,
}

impl Gateway {
    pub fn new(
        authorizer: Authorizer,
        upstream: UpstreamClient,
        default_per_page: u32,
        char_limit: usize,
    ) -> Self {
        Self {
            authorizer,
            upstream,
            default_per_page,
            char_limit,
        }
    }

    /// Build the gateway from a validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(
            &config.upstream,
            &config.credentials,
            std::time::Duration::from_secs(config.timeouts.upstream_secs),
        )?;
        Ok(Self::new(
            Authorizer::new(config.credentials.local_bearer_token.as_str()),
            upstream,
            config.upstream.default_per_page,
            config.upstream.char_limit,
        ))
    }

    /// Handle one inbound search.
    ///
    /// `body` is the raw request body; an empty body selects the category's
    /// default query. Authorization is checked before the body is looked at.
    pub async fn run(
        &self,
        category: SearchCategory,
        credential: Option<&str>,
        body: &[u8],
    ) -> Result<SearchOutcome, GatewayError> {
        self.authorizer.authorize(credential)?;

        let request = self.request_from_body(category, body)?;
        self.search(category, &request).await
    }

    /// Forward an already-authorized request.
    pub async fn search(
        &self,
        category: SearchCategory,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, GatewayError> {
        let result = self.upstream.search(category, request).await?;

        if category.paginates() {
            Ok(SearchOutcome::Chunked(paginate(&result, self.char_limit)?))
        } else {
            Ok(SearchOutcome::Json(result))
        }
    }

    fn request_from_body(
        &self,
        category: SearchCategory,
        body: &[u8],
    ) -> Result<SearchRequest, GatewayError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(SearchRequest::default_for(category, self.default_per_page));
        }
        let body: SearchBody = serde_json::from_slice(body).map_err(GatewayError::MalformedBody)?;
        Ok(SearchRequest::from_body(body, self.default_per_page)?)
    }
}
