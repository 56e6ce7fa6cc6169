//! HTTP API.
//!
//! Exposes the submission service as JSON endpoints. Public routes live
//! under `/api/v1/`, service-to-service lookups under `/api/internal/`.
//!
//! The router is composable. `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server_on, ApiServer, ApiSession};
pub use types::ApiContext;
