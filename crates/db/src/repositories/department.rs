//! Department repository.

#![allow(missing_docs)]

use std::sync::Arc;

use crate::entities::{Asset, Department, asset, department};
use assetdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

#[derive(Clone)]
pub struct DepartmentRepository {
    db: Arc<DatabaseConnection>,
}

impl DepartmentRepository {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<department::Model>> {
        Department::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<department::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {id} not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<department::Model>> {
        Department::find()
            .order_by_asc(department::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn create(&self, model: department::ActiveModel) -> AppResult<department::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if crate::is_unique_violation(&e) {
                AppError::Conflict("A department with this name already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    pub async fn update(&self, model: department::ActiveModel) -> AppResult<department::Model> {
        model.update(self.db.as_ref()).await.map_err(|e| {
            if crate::is_unique_violation(&e) {
                AppError::Conflict("A department with this name already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Count assets assigned to a department.
    pub async fn count_assets(&self, id: &str) -> AppResult<u64> {
        Asset::find()
            .filter(asset::Column::DepartmentId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn delete(&self, model: department::Model) -> AppResult<()> {
        model.delete(self.db.as_ref()).await.map_err(|e| {
            if crate::is_foreign_key_violation(&e) {
                AppError::Conflict("Department is still assigned to assets".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_delete_executes_statement() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = DepartmentRepository::new(db);
        let model = department::Model {
            id: "d1".to_string(),
            name: "Finance".to_string(),
            description: None,
            created_at: chrono::Utc::now(),
        };

        assert!(repo.delete(model).await.is_ok());
    }
}
