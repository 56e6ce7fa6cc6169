//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Route groups:
//! 1. Public submissions under `/api/v1/`
//! 2. Internal lookups under `/api/internal/` (responses are `no-store`)
//! 3. Operational routes (`/api/health`)
//!
//! Every request passes through the access log.

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
pub fn api_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let public = Router::new()
        .route(
            "/submissions",
            get(endpoints::submissions::list).post(endpoints::submissions::create),
        )
        .route("/submissions/:id", get(endpoints::submissions::detail))
        .with_state(ctx.clone());

    let internal = Router::new()
        .route("/internal/papers/:id", get(endpoints::internal::paper))
        .with_state(ctx)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let operational = Router::new().route("/health", get(endpoints::health::check));

    Router::new()
        .nest("/api/v1", public)
        .nest("/api", internal.merge(operational))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}
