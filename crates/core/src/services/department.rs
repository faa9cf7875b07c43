//! Department service.

use assetdesk_common::{AppError, AppResult, IdGenerator};
use assetdesk_db::{
    entities::{department, user},
    repositories::DepartmentRepository,
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::require_admin;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameDepartmentInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Service for managing departments.
#[derive(Clone)]
pub struct DepartmentService {
    department_repo: DepartmentRepository,
    id_gen: IdGenerator,
}

impl DepartmentService {
    #[must_use]
    pub const fn new(department_repo: DepartmentRepository) -> Self {
        Self {
            department_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateDepartmentInput,
    ) -> AppResult<department::Model> {
        require_admin(caller, "create departments")?;
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Department name is required".to_string()));
        }

        let model = department::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        };

        let created = self.department_repo.create(model).await?;
        info!(department_id = %created.id, name = %created.name, "Department created");
        Ok(created)
    }

    pub async fn list(&self) -> AppResult<Vec<department::Model>> {
        self.department_repo.list().await
    }

    pub async fn get(&self, id: &str) -> AppResult<department::Model> {
        self.department_repo.get_by_id(id).await
    }

    pub async fn rename(
        &self,
        caller: &user::Model,
        id: &str,
        input: RenameDepartmentInput,
    ) -> AppResult<department::Model> {
        require_admin(caller, "rename departments")?;
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Department name is required".to_string()));
        }

        let existing = self.department_repo.get_by_id(id).await?;
        let mut model: department::ActiveModel = existing.into();
        model.name = Set(name);
        if input.description.is_some() {
            model.description = Set(input.description);
        }

        self.department_repo.update(model).await
    }

    /// Delete a department. Refused while assets are still assigned to it.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        require_admin(caller, "delete departments")?;

        let existing = self.department_repo.get_by_id(id).await?;
        let in_use = self.department_repo.count_assets(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Department is still assigned to {in_use} asset(s)"
            )));
        }

        self.department_repo.delete(existing).await?;
        info!(department_id = %id, deleted_by = %caller.id, "Department deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetdesk_db::test_utils::TestDatabase;

    #[tokio::test]
    async fn test_rename_to_existing_name_conflicts() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.insert_user("admin1", "admin@example.com", true).await.unwrap();
        db.insert_department("d1", "Finance").await.unwrap();
        db.insert_department("d2", "Engineering").await.unwrap();
        let service = DepartmentService::new(DepartmentRepository::new(db.connection()));

        let input = RenameDepartmentInput {
            name: "Finance".to_string(),
            description: None,
        };
        let result = service.rename(&admin, "d2", input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.insert_user("admin1", "admin@example.com", true).await.unwrap();
        let service = DepartmentService::new(DepartmentRepository::new(db.connection()));

        let input = CreateDepartmentInput {
            name: "   ".to_string(),
            description: None,
        };
        let result = service.create(&admin, input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let db = TestDatabase::new().await.unwrap();
        let regular = db.insert_user("u1", "u1@example.com", false).await.unwrap();
        db.insert_department("d1", "Finance").await.unwrap();
        let service = DepartmentService::new(DepartmentRepository::new(db.connection()));

        assert!(matches!(
            service.delete(&regular, "d1").await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
