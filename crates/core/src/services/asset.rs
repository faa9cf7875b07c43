//! Asset service.

use assetdesk_common::{AppError, AppResult, IdGenerator};
use assetdesk_db::{
    entities::{asset, user},
    repositories::{AssetFilter, AssetRepository, CategoryRepository, DepartmentRepository},
};
use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::{Deserialize, Deserializer};
use tracing::info;
use validator::Validate;

use super::{clamp_limit, clamp_offset, require_admin};

/// Input for creating an asset.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    /// Purchase cost in cents.
    #[validate(range(min = 0))]
    pub cost_cents: i64,
    pub category_id: Option<String>,
    pub department_id: Option<String>,
    pub purchase_date: Option<NaiveDate>,
}

/// Input for updating an asset.
///
/// Absent fields are left unchanged; an explicit `null` clears an optional
/// field.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub cost_cents: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub department_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub purchase_date: Option<Option<NaiveDate>>,
}

/// Filters and paging for the admin asset listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssetsInput {
    pub category_id: Option<String>,
    pub department_id: Option<String>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Service for managing assets.
#[derive(Clone)]
pub struct AssetService {
    asset_repo: AssetRepository,
    category_repo: CategoryRepository,
    department_repo: DepartmentRepository,
    id_gen: IdGenerator,
}

impl AssetService {
    /// Create a new asset service.
    #[must_use]
    pub const fn new(
        asset_repo: AssetRepository,
        category_repo: CategoryRepository,
        department_repo: DepartmentRepository,
    ) -> Self {
        Self {
            asset_repo,
            category_repo,
            department_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an asset owned by the caller.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateAssetInput,
    ) -> AppResult<asset::Model> {
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Asset name is required".to_string()));
        }
        self.check_references(input.category_id.as_deref(), input.department_id.as_deref())
            .await?;

        let now = Utc::now();
        let model = asset::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            cost_cents: Set(input.cost_cents),
            category_id: Set(input.category_id),
            department_id: Set(input.department_id),
            purchase_date: Set(input.purchase_date),
            owner_id: Set(caller.id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = self.asset_repo.create(model).await?;
        info!(asset_id = %created.id, owner_id = %created.owner_id, "Asset created");
        Ok(created)
    }

    /// Get an asset visible to the caller (owner or admin).
    pub async fn get(&self, caller: &user::Model, id: &str) -> AppResult<asset::Model> {
        let asset = self.asset_repo.get_by_id(id).await?;

        if asset.owner_id != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden("Not the asset owner".to_string()));
        }

        Ok(asset)
    }

    /// List the caller's own assets.
    pub async fn list_for_owner(&self, caller: &user::Model) -> AppResult<Vec<asset::Model>> {
        self.asset_repo.list_by_owner(&caller.id).await
    }

    /// List every asset. Admin only.
    pub async fn list_all(
        &self,
        caller: &user::Model,
        input: ListAssetsInput,
    ) -> AppResult<Vec<asset::Model>> {
        require_admin(caller, "list all assets")?;

        let filter = AssetFilter {
            category_id: input.category_id,
            department_id: input.department_id,
        };
        self.asset_repo
            .list(&filter, clamp_limit(input.limit), clamp_offset(input.offset))
            .await
    }

    /// Update an asset's details. Ownership never changes.
    pub async fn update(
        &self,
        caller: &user::Model,
        id: &str,
        input: UpdateAssetInput,
    ) -> AppResult<asset::Model> {
        input.validate()?;
        let existing = self.get(caller, id).await?;

        let category_id = input.category_id.as_ref().and_then(Option::as_deref);
        let department_id = input.department_id.as_ref().and_then(Option::as_deref);
        self.check_references(category_id, department_id).await?;

        let mut model: asset::ActiveModel = existing.into();
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Asset name is required".to_string()));
            }
            model.name = Set(name);
        }
        if let Some(cost_cents) = input.cost_cents {
            model.cost_cents = Set(cost_cents);
        }
        if let Some(category_id) = input.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(department_id) = input.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(purchase_date) = input.purchase_date {
            model.purchase_date = Set(purchase_date);
        }
        model.updated_at = Set(Utc::now());

        let updated = self.asset_repo.update(model).await?;
        info!(asset_id = %updated.id, updated_by = %caller.id, "Asset updated");
        Ok(updated)
    }

    /// Delete an asset directly. Admin only.
    ///
    /// Deletion requests pointing at the asset keep their snapshot; their
    /// asset reference is cleared by the store.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        require_admin(caller, "delete assets")?;

        let existing = self.asset_repo.get_by_id(id).await?;
        self.asset_repo.delete(existing).await?;

        info!(asset_id = %id, deleted_by = %caller.id, "Asset deleted");
        Ok(())
    }

    async fn check_references(
        &self,
        category_id: Option<&str>,
        department_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(category_id) = category_id
            && self.category_repo.find_by_id(category_id).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "Category {category_id} does not exist"
            )));
        }
        if let Some(department_id) = department_id
            && self.department_repo.find_by_id(department_id).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "Department {department_id} does not exist"
            )));
        }
        Ok(())
    }
}
