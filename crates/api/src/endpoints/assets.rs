//! Asset endpoints.

use assetdesk_common::AppResult;
use assetdesk_core::{CreateAssetInput, ListAssetsInput, UpdateAssetInput};
use assetdesk_db::entities::asset;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, JsonBody, QueryParams},
    middleware::AppState,
    response::{ApiResponse, ok},
};

/// Create asset router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_own_assets).post(create_asset))
        .route("/all", get(list_all_assets))
        .route(
            "/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
}

/// Asset response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    pub name: String,
    pub cost_cents: i64,
    pub category_id: Option<String>,
    pub department_id: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<asset::Model> for AssetResponse {
    fn from(asset: asset::Model) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            cost_cents: asset.cost_cents,
            category_id: asset.category_id,
            department_id: asset.department_id,
            purchase_date: asset.purchase_date,
            owner_id: asset.owner_id,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

/// List the caller's assets.
async fn list_own_assets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AssetResponse>>> {
    let assets = state.asset_service.list_for_owner(&user).await?;
    Ok(ApiResponse::ok(assets.into_iter().map(Into::into).collect()))
}

/// List every asset (admin only).
async fn list_all_assets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListAssetsInput>,
) -> AppResult<ApiResponse<Vec<AssetResponse>>> {
    let assets = state.asset_service.list_all(&user, query).await?;
    Ok(ApiResponse::ok(assets.into_iter().map(Into::into).collect()))
}

/// Create an asset owned by the caller.
async fn create_asset(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateAssetInput>,
) -> AppResult<ApiResponse<AssetResponse>> {
    let asset = state.asset_service.create(&user, input).await?;
    Ok(ApiResponse::ok(asset.into()))
}

async fn get_asset(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AssetResponse>> {
    let asset = state.asset_service.get(&user, &id).await?;
    Ok(ApiResponse::ok(asset.into()))
}

async fn update_asset(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateAssetInput>,
) -> AppResult<ApiResponse<AssetResponse>> {
    let asset = state.asset_service.update(&user, &id, input).await?;
    Ok(ApiResponse::ok(asset.into()))
}

/// Delete an asset (admin only).
async fn delete_asset(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.asset_service.delete(&user, &id).await?;
    Ok(ok())
}
