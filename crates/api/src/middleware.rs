//! API middleware.

use assetdesk_core::{
    AssetService, CategoryService, DeletionRequestService, DepartmentService, UserService,
};
use assetdesk_db::repositories::{
    AssetRepository, CategoryRepository, DeletionRequestRepository, DepartmentRepository,
    UserRepository,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub department_service: DepartmentService,
    pub asset_service: AssetService,
    pub deletion_request_service: DeletionRequestService,
}

impl AppState {
    /// Wire every service against one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let category_repo = CategoryRepository::new(Arc::clone(&db));
        let department_repo = DepartmentRepository::new(Arc::clone(&db));
        let asset_repo = AssetRepository::new(Arc::clone(&db));
        let request_repo = DeletionRequestRepository::new(db);

        Self {
            user_service: UserService::new(user_repo),
            category_service: CategoryService::new(category_repo.clone()),
            department_service: DepartmentService::new(department_repo.clone()),
            asset_service: AssetService::new(asset_repo.clone(), category_repo, department_repo),
            deletion_request_service: DeletionRequestService::new(request_repo, asset_repo),
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions. Unknown tokens are ignored here; handlers that need
/// a caller reject through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
