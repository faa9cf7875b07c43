//! API endpoints.

mod account;
mod admin;
mod assets;
mod categories;
mod deletion_requests;
mod departments;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router. Mounted under `/api` by the server.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(account::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/departments", departments::router())
        .nest("/assets", assets::router())
        .nest("/deletion-requests", deletion_requests::router())
        .nest("/admin", admin::router())
}
