//! Upstream search API integration.
//!
//! # Data Flow
//! ```text
//! Gateway (authorized SearchRequest)
//!     → client.rs (URL + headers, one GET)
//!     → 200: serde_json::Value, untouched
//!     → otherwise: UpstreamError::Status with status and body kept verbatim
//! ```

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{
    InvalidRequest, SearchBody, SearchCategory, SearchRequest, UnknownCategory, UpstreamError,
    UpstreamResult,
};
