//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: addresses parse, the
//! upstream URL is usable, sizes and timeouts are non-zero, secrets are set.
//! Every problem is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid upstream.base_url '{0}': {1}")]
    InvalidBaseUrl(String, String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} is empty")]
    EmptySecret(&'static str),

    #[error("timeouts.request_secs ({request_secs}) must exceed timeouts.upstream_secs ({upstream_secs})")]
    TimeoutOrder { request_secs: u64, upstream_secs: u64 },
}

/// Check a loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::InvalidBaseUrl(
                config.upstream.base_url.clone(),
                "expected an http(s) URL".to_string(),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::InvalidBaseUrl(
                config.upstream.base_url.clone(),
                e.to_string(),
            ));
        }
    }

    if config.upstream.default_per_page == 0 {
        errors.push(ValidationError::Zero("upstream.default_per_page"));
    }
    if config.upstream.char_limit == 0 {
        errors.push(ValidationError::Zero("upstream.char_limit"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.upstream_secs"));
    }
    // A slow upstream must hit the client timeout (504), not the request one.
    let timeouts = &config.timeouts;
    if timeouts.request_secs > 0 && timeouts.request_secs <= timeouts.upstream_secs {
        errors.push(ValidationError::TimeoutOrder {
            request_secs: timeouts.request_secs,
            upstream_secs: timeouts.upstream_secs,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if config.credentials.upstream_token.is_empty() {
        errors.push(ValidationError::EmptySecret("upstream token"));
    }
    if config.credentials.local_bearer_token.is_empty() {
        errors.push(ValidationError::EmptySecret("local bearer token"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
