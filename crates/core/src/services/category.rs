//! Category service.

use assetdesk_common::{AppError, AppResult, IdGenerator};
use assetdesk_db::{
    entities::{category, user},
    repositories::CategoryRepository,
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::require_admin;

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Input for renaming a category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Service for managing asset categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a category. Admin only.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateCategoryInput,
    ) -> AppResult<category::Model> {
        require_admin(caller, "create categories")?;
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        };

        let created = self.category_repo.create(model).await?;
        info!(category_id = %created.id, name = %created.name, "Category created");
        Ok(created)
    }

    /// List all categories.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.list().await
    }

    /// Get a category by ID.
    pub async fn get(&self, id: &str) -> AppResult<category::Model> {
        self.category_repo.get_by_id(id).await
    }

    /// Rename a category. Admin only.
    pub async fn rename(
        &self,
        caller: &user::Model,
        id: &str,
        input: RenameCategoryInput,
    ) -> AppResult<category::Model> {
        require_admin(caller, "rename categories")?;
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        let existing = self.category_repo.get_by_id(id).await?;
        let mut model: category::ActiveModel = existing.into();
        model.name = Set(name);
        if input.description.is_some() {
            model.description = Set(input.description);
        }

        self.category_repo.update(model).await
    }

    /// Delete a category. Admin only; refused while assets still use it.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        require_admin(caller, "delete categories")?;

        let existing = self.category_repo.get_by_id(id).await?;
        let in_use = self.category_repo.count_assets(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category is still assigned to {in_use} asset(s)"
            )));
        }

        self.category_repo.delete(existing).await?;
        info!(category_id = %id, deleted_by = %caller.id, "Category deleted");
        Ok(())
    }
}
