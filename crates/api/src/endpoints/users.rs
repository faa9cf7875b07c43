//! User management endpoints.

use assetdesk_common::AppResult;
use assetdesk_core::{CreateUserInput, clamp_limit};
use assetdesk_db::entities::user;
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, JsonBody, QueryParams},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}/admin", post(set_admin))
}

/// Public user shape. Never carries the access token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Response for a newly created user, including the token to hand over.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

async fn list_users(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListUsersQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list(&caller, clamp_limit(query.limit), query.offset)
        .await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

async fn create_user(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateUserInput>,
) -> AppResult<ApiResponse<CreatedUserResponse>> {
    let mut created = state.user_service.create(&caller, input).await?;
    let token = created.token.take();
    Ok(ApiResponse::ok(CreatedUserResponse {
        user: created.into(),
        token,
    }))
}

async fn set_admin(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<SetAdminRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .set_admin(&caller, &id, req.is_admin)
        .await?;
    Ok(ApiResponse::ok(updated.into()))
}
