//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one POST route per search category
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Dispatch requests to the search gateway
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Request},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::gateway::{Gateway, GatewayError};
use crate::http::request::{request_id, x_request_id, MakeRequestUuid};
use crate::observability::metrics;
use crate::security::extract_bearer;
use crate::upstream::{SearchCategory, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// HTTP server for the search proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the upstream client cannot be built from the credentials.
    pub fn new(config: ProxyConfig) -> Result<Self, UpstreamError> {
        let state = AppState {
            gateway: Arc::new(Gateway::from_config(&config)?),
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router: Router<AppState> = Router::new().route("/health", get(health_handler));

        for category in SearchCategory::ALL {
            let handler = move |State(state): State<AppState>, headers: HeaderMap, body: Bytes| {
                search_handler(state, category, headers, body)
            };
            router = router
                .route(&format!("/search/{}", category), post(handler))
                .route(&format!("/search/{}/", category), post(handler));
        }

        router
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(x_request_id()))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::new(x_request_id(), MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Search handler shared by every category route.
async fn search_handler(
    state: AppState,
    category: SearchCategory,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    tracing::debug!(
        request_id = %request_id(&headers),
        %category,
        body_len = body.len(),
        "Handling search"
    );

    let response = match state.gateway.run(category, extract_bearer(&headers), &body).await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => {
            if let GatewayError::Upstream(upstream) = &e {
                metrics::record_upstream_error(category, upstream.kind());
            }
            e.into_response()
        }
    };

    metrics::record_request(category, response.status().as_u16(), start_time);
    response
}
