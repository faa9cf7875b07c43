//! HTTP API layer for assetdesk.
//!
//! - **Endpoints**: JSON routes for users, catalog data, assets and the
//!   deletion request workflow
//! - **Extractors**: authenticated caller, JSON bodies and query strings
//! - **Middleware**: bearer token authentication and shared state
//!
//! Built on Axum 0.8. [`build_router`] mounts [`router`] under `/api`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

use axum::{Router, middleware::from_fn_with_state};

/// Build the `/api` application with authentication applied.
///
/// The server adds its own outer layers (tracing, CORS, health check).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
