//! Authenticated relay for a code-hosting platform's search API.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pagination;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use gateway::{Gateway, GatewayError, SearchOutcome};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
