//! Asset repository.

use std::sync::Arc;

use crate::entities::{Asset, asset};
use assetdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Optional filters for the admin asset listing.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub category_id: Option<String>,
    pub department_id: Option<String>,
}

/// Asset repository for database operations.
#[derive(Clone)]
pub struct AssetRepository {
    db: Arc<DatabaseConnection>,
}

impl AssetRepository {
    /// Create a new asset repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an asset by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<asset::Model>> {
        Asset::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an asset by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<asset::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {id} not found")))
    }

    /// List assets owned by a user, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<asset::Model>> {
        Asset::find()
            .filter(asset::Column::OwnerId.eq(owner_id))
            .order_by_desc(asset::Column::CreatedAt)
            .order_by_desc(asset::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all assets with optional category/department filters.
    pub async fn list(
        &self,
        filter: &AssetFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<asset::Model>> {
        let mut query = Asset::find()
            .order_by_desc(asset::Column::CreatedAt)
            .order_by_desc(asset::Column::Id);

        if let Some(category_id) = &filter.category_id {
            query = query.filter(asset::Column::CategoryId.eq(category_id.as_str()));
        }
        if let Some(department_id) = &filter.department_id {
            query = query.filter(asset::Column::DepartmentId.eq(department_id.as_str()));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an asset.
    pub async fn create(&self, model: asset::ActiveModel) -> AppResult<asset::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if crate::is_foreign_key_violation(&e) {
                AppError::Validation("Referenced category, department or owner does not exist".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update an asset.
    pub async fn update(&self, model: asset::ActiveModel) -> AppResult<asset::Model> {
        model.update(self.db.as_ref()).await.map_err(|e| {
            if crate::is_foreign_key_violation(&e) {
                AppError::Validation("Referenced category or department does not exist".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete an asset. Deletion requests referencing it keep their snapshot.
    pub async fn delete(&self, model: asset::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
