//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! Everything except the credentials can come from a TOML file; the
//! credentials are only ever read from the environment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pagination::DEFAULT_CHAR_LIMIT;

/// Root configuration for the search proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote search API settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Secrets, populated from the environment by the loader.
    #[serde(skip)]
    pub credentials: Credentials,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// How the upstream token is presented in the outbound `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: token <upstream_token>`
    #[default]
    Token,
    /// `Authorization: Bearer <upstream_token>`
    Bearer,
}

impl AuthScheme {
    /// Header prefix for this scheme.
    pub fn prefix(self) -> &'static str {
        match self {
            AuthScheme::Token => "token",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

/// Remote search API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base search URL; the category is appended as a path segment.
    pub base_url: String,

    /// Media type sent in the `Accept` header (selects the API version).
    pub accept: String,

    /// `User-Agent` sent upstream.
    pub user_agent: String,

    /// Authorization scheme for the upstream token.
    pub auth_scheme: AuthScheme,

    /// `per_page` used when the caller does not give one.
    pub default_per_page: u32,

    /// Chunk size, in characters, for paginated responses.
    pub char_limit: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com/search".to_string(),
            accept: "application/vnd.github.v3+json".to_string(),
            user_agent: concat!("search-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            auth_scheme: AuthScheme::Token,
            default_per_page: 10,
            char_limit: DEFAULT_CHAR_LIMIT,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for an inbound request, in seconds.
    pub request_secs: u64,

    /// Transport timeout for the single upstream call, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            upstream_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// The two process-wide secrets. Never mutated after startup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Token presented to the remote search API.
    pub upstream_token: String,
    /// Token inbound callers must present as `Authorization: Bearer <token>`.
    pub local_bearer_token: String,
}

impl Credentials {
    pub fn new(upstream_token: impl Into<String>, local_bearer_token: impl Into<String>) -> Self {
        Self {
            upstream_token: upstream_token.into(),
            local_bearer_token: local_bearer_token.into(),
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("upstream_token", &"<redacted>")
            .field("local_bearer_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.upstream.base_url, "https://api.github.com/search");
        assert_eq!(config.upstream.default_per_page, 10);
        assert_eq!(config.upstream.char_limit, 500);
        assert_eq!(config.upstream.auth_scheme, AuthScheme::Token);
    }

    #[test]
    fn test_partial_sections() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            auth_scheme = "bearer"
            char_limit = 64

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.upstream.char_limit, 64);
        assert_eq!(config.upstream.accept, "application/vnd.github.v3+json");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new("ghp_secret", "local_secret");
        let out = format!("{:?}", creds);
        assert!(!out.contains("ghp_secret"));
        assert!(!out.contains("local_secret"));
    }

    #[test]
    fn test_auth_scheme_prefix() {
        assert_eq!(AuthScheme::Token.prefix(), "token");
        assert_eq!(AuthScheme::Bearer.prefix(), "Bearer");
    }
}
