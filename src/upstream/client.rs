//! HTTP client for the remote search API.
//!
//! # Responsibilities
//! - Build `<base>/<category>?q=..&page=..&per_page=..`
//! - Attach the upstream token and the API version `Accept` header
//! - Issue exactly one GET per search, no retries
//! - Relay non-200 responses as [`UpstreamError::Status`]

use std::time::Duration;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;

use crate::config::{Credentials, UpstreamConfig};
use crate::upstream::types::{SearchCategory, SearchRequest, UpstreamError, UpstreamResult};

/// Client for the upstream search endpoint.
///
/// Cheap to clone; clones share one connection pool. Holds no mutable state,
/// so concurrent searches are independent.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a new upstream client.
    ///
    /// `timeout` is the transport deadline for each call; a slow upstream
    /// holds the inbound request until it fires.
    pub fn new(
        config: &UpstreamConfig,
        credentials: &Credentials,
        timeout: Duration,
    ) -> UpstreamResult<Self> {
        let mut authorization = HeaderValue::from_str(&format!(
            "{} {}",
            config.auth_scheme.prefix(),
            credentials.upstream_token
        ))
        .map_err(|_| UpstreamError::InvalidHeader("upstream token".to_string()))?;
        authorization.set_sensitive(true);

        let accept = HeaderValue::from_str(&config.accept)
            .map_err(|_| UpstreamError::InvalidHeader(format!("accept '{}'", config.accept)))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, accept);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Outbound URL for a search. The query text is inserted as given.
    pub fn search_url(&self, category: SearchCategory, request: &SearchRequest) -> String {
        format!(
            "{}/{}?q={}&page={}&per_page={}",
            self.base_url,
            category,
            request.query(),
            request.page(),
            request.per_page()
        )
    }

    /// Run one search and return the upstream JSON unchanged.
    pub async fn search(
        &self,
        category: SearchCategory,
        request: &SearchRequest,
    ) -> UpstreamResult<Value> {
        let url = self.search_url(category, request);
        tracing::debug!(%category, page = request.page(), per_page = request.per_page(), "Querying upstream");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let content_type = response.headers().get(CONTENT_TYPE).cloned();
            let body = response.bytes().await?;
            tracing::warn!(%category, status = %status, "Upstream rejected search");
            return Err(UpstreamError::Status {
                status,
                content_type,
                body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(UpstreamError::InvalidJson)
    }
}
