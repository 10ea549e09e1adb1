//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, POST /search/{category})
//!     → request.rs (request ID)
//!     → gateway (authorize, forward, paginate)
//!     → response.rs (JSON, chunked stream, or relayed upstream error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
