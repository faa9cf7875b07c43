//! Current account endpoint.

use assetdesk_common::AppResult;
use axum::{Router, routing::get};

use crate::{extractors::{AuthUser, JsonBody}, middleware::AppState, response::ApiResponse};

use super::users::UserResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/i", get(me))
}

/// Get the authenticated user.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<UserResponse>> {
    Ok(ApiResponse::ok(user.into()))
}
