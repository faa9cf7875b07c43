//! Deletion request endpoints for asset owners.

use assetdesk_common::AppResult;
use assetdesk_core::{DeletionStatus, SubmitDeletionRequestInput};
use assetdesk_db::entities::deletion_request;
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::ApiResponse,
};

/// Create deletion request router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_requests).post(submit_request))
        .route("/{id}", get(get_request))
        .route("/{id}/cancel", post(cancel_request))
}

/// Deletion request response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequestResponse {
    pub id: String,
    /// `null` once the asset has been deleted
    pub asset_id: Option<String>,
    pub asset_name: String,
    pub asset_cost_cents: i64,
    pub requested_by: String,
    pub requester_email: String,
    pub justification: String,
    pub status: DeletionStatus,
    pub reviewed_by: Option<String>,
    pub reviewer_email: Option<String>,
    pub review_comment: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<deletion_request::Model> for DeletionRequestResponse {
    fn from(request: deletion_request::Model) -> Self {
        Self {
            id: request.id,
            asset_id: request.asset_id,
            asset_name: request.asset_name,
            asset_cost_cents: request.asset_cost_cents,
            requested_by: request.requested_by,
            requester_email: request.requester_email,
            justification: request.justification,
            status: request.status,
            reviewed_by: request.reviewed_by,
            reviewer_email: request.reviewer_email,
            review_comment: request.review_comment,
            reviewed_at: request.reviewed_at,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// List the caller's own requests, newest first.
async fn list_my_requests(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DeletionRequestResponse>>> {
    let requests = state
        .deletion_request_service
        .list_for_user(&user.id)
        .await?;
    Ok(ApiResponse::ok(requests.into_iter().map(Into::into).collect()))
}

/// Submit a deletion request for one of the caller's assets.
async fn submit_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SubmitDeletionRequestInput>,
) -> AppResult<ApiResponse<DeletionRequestResponse>> {
    let request = state.deletion_request_service.submit(&user, input).await?;
    Ok(ApiResponse::ok(request.into()))
}

async fn get_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletionRequestResponse>> {
    let request = state.deletion_request_service.get(&user, &id).await?;
    Ok(ApiResponse::ok(request.into()))
}

/// Withdraw a pending request.
async fn cancel_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletionRequestResponse>> {
    let request = state.deletion_request_service.cancel(&user, &id).await?;
    Ok(ApiResponse::ok(request.into()))
}
