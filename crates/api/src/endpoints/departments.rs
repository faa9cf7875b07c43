//! Department endpoints.

use assetdesk_common::AppResult;
use assetdesk_core::{CreateDepartmentInput, RenameDepartmentInput};
use assetdesk_db::entities::department;
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

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/{id}",
            get(get_department)
                .put(rename_department)
                .delete(delete_department),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<department::Model> for DepartmentResponse {
    fn from(department: department::Model) -> Self {
        Self {
            id: department.id,
            name: department.name,
            description: department.description,
            created_at: department.created_at,
        }
    }
}

async fn list_departments(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DepartmentResponse>>> {
    let departments = state.department_service.list().await?;
    Ok(ApiResponse::ok(
        departments.into_iter().map(Into::into).collect(),
    ))
}

async fn get_department(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    let department = state.department_service.get(&id).await?;
    Ok(ApiResponse::ok(department.into()))
}

async fn create_department(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateDepartmentInput>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    let department = state.department_service.create(&user, input).await?;
    Ok(ApiResponse::ok(department.into()))
}

async fn rename_department(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<RenameDepartmentInput>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    let department = state.department_service.rename(&user, &id, input).await?;
    Ok(ApiResponse::ok(department.into()))
}

async fn delete_department(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.department_service.delete(&user, &id).await?;
    Ok(ok())
}
