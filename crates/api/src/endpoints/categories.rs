//! Category endpoints.

use assetdesk_common::AppResult;
use assetdesk_core::{CreateCategoryInput, RenameCategoryInput};
use assetdesk_db::entities::category;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
    response::{ApiResponse, ok},
};

/// Create category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(rename_category).delete(delete_category),
        )
}

/// Category response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<category::Model> for CategoryResponse {
    fn from(category: category::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
        }
    }
}

/// List categories.
async fn list_categories(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.category_service.list().await?;
    Ok(ApiResponse::ok(
        categories.into_iter().map(Into::into).collect(),
    ))
}

/// Get a category.
async fn get_category(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state.category_service.get(&id).await?;
    Ok(ApiResponse::ok(category.into()))
}

/// Create a category (admin only).
async fn create_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateCategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state.category_service.create(&user, input).await?;
    Ok(ApiResponse::ok(category.into()))
}

/// Rename a category (admin only).
async fn rename_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<RenameCategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state.category_service.rename(&user, &id, input).await?;
    Ok(ApiResponse::ok(category.into()))
}

/// Delete a category (admin only).
async fn delete_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.category_service.delete(&user, &id).await?;
    Ok(ok())
}
