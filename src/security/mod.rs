//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming search request:
//!     → access_control.rs (extract Bearer token, compare with local token)
//!     → 403 on mismatch, upstream never contacted
//!     → otherwise pass to the gateway
//! ```
//!
//! # Design Decisions
//! - Fail closed: an absent or malformed header is the same as a wrong token
//! - Token comparison does not short-circuit on the first differing byte

pub mod access_control;

pub use access_control::{extract_bearer, AuthError, Authorizer};
