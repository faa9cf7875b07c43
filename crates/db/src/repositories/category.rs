//! Category repository.

use std::sync::Arc;

use crate::entities::{Asset, Category, asset, category};
use assetdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a category by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
    }

    /// List all categories ordered by name.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if crate::is_unique_violation(&e) {
                AppError::Conflict("A category with this name already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update a category.
    pub async fn update(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model.update(self.db.as_ref()).await.map_err(|e| {
            if crate::is_unique_violation(&e) {
                AppError::Conflict("A category with this name already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Count assets filed under a category.
    pub async fn count_assets(&self, id: &str) -> AppResult<u64> {
        Asset::find()
            .filter(asset::Column::CategoryId.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a category.
    pub async fn delete(&self, model: category::Model) -> AppResult<()> {
        model.delete(self.db.as_ref()).await.map_err(|e| {
            if crate::is_foreign_key_violation(&e) {
                AppError::Conflict("Category is still assigned to assets".to_string())
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
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_category(id: &str, name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_returns_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_category("c1", "Laptops"),
                    create_test_category("c2", "Monitors"),
                ]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.list().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Laptops");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
