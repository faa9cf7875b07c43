//! Admin endpoints for reviewing deletion requests.

use assetdesk_common::{AppError, AppResult};
use assetdesk_core::{DeletionStatus, ReviewInput, clamp_limit};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, JsonBody, QueryParams},
    middleware::AppState,
    response::ApiResponse,
};

use super::deletion_requests::DeletionRequestResponse;

/// Create admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deletion-requests", get(list_requests))
        .route("/deletion-requests/pending-count", get(pending_count))
        .route("/deletion-requests/{id}/approve", post(approve_request))
        .route("/deletion-requests/{id}/reject", post(reject_request))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    pub status: Option<String>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCountResponse {
    pub count: u64,
}

/// List all deletion requests, optionally by status.
async fn list_requests(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListRequestsQuery>,
) -> AppResult<ApiResponse<Vec<DeletionRequestResponse>>> {
    let status = match query.status.as_deref() {
        None | Some("" | "all") => None,
        Some(s) => Some(
            DeletionStatus::parse(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {s}")))?,
        ),
    };

    let requests = state
        .deletion_request_service
        .list_all(&admin, status, clamp_limit(query.limit), query.offset)
        .await?;
    Ok(ApiResponse::ok(requests.into_iter().map(Into::into).collect()))
}

/// Number of requests awaiting review.
async fn pending_count(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PendingCountResponse>> {
    let count = state.deletion_request_service.count_pending(&admin).await?;
    Ok(ApiResponse::ok(PendingCountResponse { count }))
}

/// Approve a request and delete its asset. The body is optional.
async fn approve_request(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<DeletionRequestResponse>> {
    let input: ReviewInput = if body.is_empty() {
        ReviewInput::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?
    };
    let request = state
        .deletion_request_service
        .approve(&admin, &id, input)
        .await?;
    Ok(ApiResponse::ok(request.into()))
}

/// Reject a request with a mandatory comment.
async fn reject_request(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ReviewInput>,
) -> AppResult<ApiResponse<DeletionRequestResponse>> {
    let request = state
        .deletion_request_service
        .reject(&admin, &id, input)
        .await?;
    Ok(ApiResponse::ok(request.into()))
}
