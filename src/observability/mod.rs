//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway, upstream client, HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every request span
//! - Secrets never appear in log fields

pub mod logging;
pub mod metrics;
