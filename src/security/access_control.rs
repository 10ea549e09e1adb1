//! Bearer-token access control for the search endpoints.

use std::fmt;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use thiserror::Error;

/// Authorization failure. Always surfaces as `403 Forbidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Forbidden")]
    Forbidden,
}

/// Checks presented bearer credentials against the local bearer token.
///
/// Stateless: each call is an independent one-shot check.
#[derive(Clone)]
pub struct Authorizer {
    token: Arc<str>,
}

impl Authorizer {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Succeeds iff `presented` is byte-for-byte the configured token.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), AuthError> {
        match presented {
            Some(candidate) if constant_time_eq(candidate.as_bytes(), self.token.as_bytes()) => {
                Ok(())
            }
            _ => Err(AuthError::Forbidden),
        }
    }
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer").finish_non_exhaustive()
    }
}

/// Extract the raw token from an `Authorization: Bearer <token>` header.
///
/// Missing header, non-ASCII value, another scheme, or an empty token all
/// yield `None`.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

// Length leaks, contents do not.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
