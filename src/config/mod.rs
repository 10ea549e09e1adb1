//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)       environment (secrets)
//!     → loader.rs (parse & deserialize, read GITHUB_TOKEN / BEARER_TOKEN)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc with the gateway and the upstream client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All file fields have defaults so the file itself is optional
//! - A missing secret aborts startup, it is never a per-request error

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::{
    AuthScheme, Credentials, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    UpstreamConfig,
};
