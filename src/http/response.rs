//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn gateway output into HTTP responses
//! - Stream paginated results chunk by chunk
//! - Map gateway errors to status codes, relaying upstream failures verbatim
//!
//! # Design Decisions
//! - Chunked bodies are pulled lazily by hyper; nothing is produced ahead of the socket
//! - Every error response carries a body
//! - Upstream timeouts result in 504 Gateway Timeout, other transport failures in 502

use std::convert::Infallible;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::gateway::{GatewayError, SearchOutcome};
use crate::observability::metrics;
use crate::upstream::UpstreamError;

impl IntoResponse for SearchOutcome {
    fn into_response(self) -> Response {
        match self {
            SearchOutcome::Json(value) => Json(value).into_response(),
            SearchOutcome::Chunked(chunks) => {
                let stream = futures_util::StreamExt::map(chunks, |chunk| {
                    metrics::record_chunk();
                    Ok::<_, Infallible>(chunk)
                });
                let mut response = Response::new(Body::from_stream(stream));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                response
            }
        }
    }
}

impl GatewayError {
    /// Status code this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Auth(_) => StatusCode::FORBIDDEN,
            GatewayError::MalformedBody(_) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Upstream(UpstreamError::Status { status, .. }) => *status,
            GatewayError::Upstream(UpstreamError::Transport(e)) if e.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            GatewayError::Upstream(UpstreamError::Transport(_))
            | GatewayError::Upstream(UpstreamError::InvalidJson(_)) => StatusCode::BAD_GATEWAY,
            GatewayError::Upstream(UpstreamError::InvalidHeader(_))
            | GatewayError::Pagination(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GatewayError::Upstream(UpstreamError::Status {
                status,
                content_type,
                body,
            }) => {
                let mut response = (status, body).into_response();
                match content_type {
                    Some(value) => {
                        response.headers_mut().insert(header::CONTENT_TYPE, value);
                    }
                    None => {
                        response.headers_mut().remove(header::CONTENT_TYPE);
                    }
                }
                response
            }
            other => {
                if status.is_server_error() {
                    tracing::error!(status = %status, error = %other, "Search failed");
                } else {
                    tracing::debug!(status = %status, error = %other, "Search rejected");
                }
                (status, Json(json!({ "message": other.to_string() }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::ChunkStream;
    use crate::security::AuthError;
    use crate::upstream::InvalidRequest;
    use axum::body::{to_bytes, Bytes};

    async fn body_of(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn test_upstream_status_is_relayed_verbatim() {
        let err = GatewayError::Upstream(UpstreamError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            content_type: Some(HeaderValue::from_static("application/json; charset=utf-8")),
            body: Bytes::from_static(br#"{"message":"Validation Failed"}"#),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        assert_eq!(body_of(response).await, r#"{"message":"Validation Failed"}"#);
    }

    #[tokio::test]
    async fn test_forbidden_has_a_body() {
        let response = GatewayError::Auth(AuthError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await, r#"{"message":"Forbidden"}"#);
    }

    #[test]
    fn test_invalid_request_is_bad_request() {
        let err = GatewayError::InvalidRequest(InvalidRequest::EmptyQuery);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chunked_outcome_streams_whole_document() {
        let chunks = ChunkStream::new(r#"{"items":[1,2,3]}"#.to_string(), 4).unwrap();
        let response = SearchOutcome::Chunked(chunks).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_of(response).await, r#"{"items":[1,2,3]}"#);
    }
}
