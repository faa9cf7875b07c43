//! User service.

use assetdesk_common::{AppError, AppResult, IdGenerator, config::BootstrapConfig};
use assetdesk_db::{entities::user, repositories::UserRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{clamp_offset, require_admin};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[serde(default)]
    pub is_admin: bool,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a user with a fresh access token. Admin only.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateUserInput,
    ) -> AppResult<user::Model> {
        require_admin(caller, "create users")?;
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            name: Set(input.name),
            token: Set(Some(self.id_gen.generate_token())),
            is_admin: Set(input.is_admin),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = self.user_repo.create(model).await?;
        info!(user_id = %created.id, created_by = %caller.id, is_admin = created.is_admin, "User created");
        Ok(created)
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// List users. Admin only.
    pub async fn list(
        &self,
        caller: &user::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        require_admin(caller, "list users")?;
        self.user_repo.list(limit, clamp_offset(offset)).await
    }

    /// Grant or revoke the admin capability. Admin only.
    ///
    /// An admin cannot revoke their own access, so the last admin can never
    /// lock everyone out.
    pub async fn set_admin(
        &self,
        caller: &user::Model,
        user_id: &str,
        is_admin: bool,
    ) -> AppResult<user::Model> {
        require_admin(caller, "change admin access")?;

        if caller.id == user_id && !is_admin {
            return Err(AppError::BadRequest(
                "You cannot revoke your own admin access".to_string(),
            ));
        }

        let target = self.user_repo.get_by_id(user_id).await?;
        if target.is_admin == is_admin {
            return Ok(target);
        }

        let mut model: user::ActiveModel = target.into();
        model.is_admin = Set(is_admin);
        model.updated_at = Set(Utc::now());

        let updated = self.user_repo.update(model).await?;
        info!(user_id = %updated.id, changed_by = %caller.id, is_admin, "Admin access changed");
        Ok(updated)
    }

    /// Make sure the configured bootstrap administrator exists.
    ///
    /// Does nothing once any admin exists. Otherwise promotes the user with
    /// the configured email, or creates it, and assigns the configured token.
    pub async fn ensure_bootstrap_admin(
        &self,
        bootstrap: &BootstrapConfig,
    ) -> AppResult<Option<user::Model>> {
        if self.user_repo.count_admins().await? > 0 {
            return Ok(None);
        }

        let email = bootstrap.admin_email.trim().to_lowercase();
        if email.is_empty() || bootstrap.admin_token.is_empty() {
            return Err(AppError::Config(
                "bootstrap.admin_email and bootstrap.admin_token must be set".to_string(),
            ));
        }

        let now = Utc::now();
        let admin = if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            let mut model: user::ActiveModel = existing.into();
            model.is_admin = Set(true);
            model.token = Set(Some(bootstrap.admin_token.clone()));
            model.updated_at = Set(now);
            self.user_repo.update(model).await?
        } else {
            let model = user::ActiveModel {
                id: Set(self.id_gen.generate()),
                email: Set(email),
                name: Set(Some("Administrator".to_string())),
                token: Set(Some(bootstrap.admin_token.clone())),
                is_admin: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };
            self.user_repo.create(model).await?
        };

        info!(user_id = %admin.id, email = %admin.email, "Bootstrap admin ready");
        Ok(Some(admin))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetdesk_db::test_utils::TestDatabase;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    async fn setup() -> (TestDatabase, UserService, user::Model) {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.insert_user("admin1", "admin@example.com", true).await.unwrap();
        let service = UserService::new(UserRepository::new(db.connection()));
        (db, service, admin)
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(db));

        let result = service.authenticate_by_token("invalid").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_create_user_lowercases_email_and_issues_token() {
        let (_db, service, admin) = setup().await;

        let input = CreateUserInput {
            email: "Alice@Example.com".to_string(),
            name: Some("Alice".to_string()),
            is_admin: false,
        };
        let created = service.create(&admin, input).await.unwrap();

        assert_eq!(created.email, "alice@example.com");
        let token = created.token.clone().unwrap();
        let authed = service.authenticate_by_token(&token).await.unwrap();
        assert_eq!(authed.id, created.id);
    }

    #[tokio::test]
    async fn test_create_user_requires_admin() {
        let (db, service, _admin) = setup().await;
        let regular = db.insert_user("u1", "u1@example.com", false).await.unwrap();

        let input = CreateUserInput {
            email: "bob@example.com".to_string(),
            name: None,
            is_admin: false,
        };
        let result = service.create(&regular, input).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let (_db, service, admin) = setup().await;

        let input = CreateUserInput {
            email: "ADMIN@example.com".to_string(),
            name: None,
            is_admin: false,
        };
        let result = service.create(&admin, input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_create_user_input_validation() {
        let input = CreateUserInput {
            email: "not-an-email".to_string(),
            name: None,
            is_admin: false,
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            email: "ok@example.com".to_string(),
            name: Some(String::new()),
            is_admin: false,
        };
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_set_admin_cannot_demote_self() {
        let (_db, service, admin) = setup().await;

        let result = service.set_admin(&admin, &admin.id, false).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_set_admin_promotes_user() {
        let (db, service, admin) = setup().await;
        db.insert_user("u1", "u1@example.com", false).await.unwrap();

        let updated = service.set_admin(&admin, "u1", true).await.unwrap();
        assert!(updated.is_admin);
    }

    #[tokio::test]
    async fn test_list_requires_admin() {
        let (db, service, admin) = setup().await;
        let regular = db.insert_user("u1", "u1@example.com", false).await.unwrap();

        assert!(matches!(
            service.list(&regular, 10, 0).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(service.list(&admin, 10, 0).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_bootstrap_admin_creates_once() {
        let db = TestDatabase::new().await.unwrap();
        let service = UserService::new(UserRepository::new(db.connection()));
        let bootstrap = BootstrapConfig {
            admin_email: "root@example.com".to_string(),
            admin_token: "bootstrap-token".to_string(),
        };

        let created = service.ensure_bootstrap_admin(&bootstrap).await.unwrap();
        assert!(created.unwrap().is_admin);

        let again = service.ensure_bootstrap_admin(&bootstrap).await.unwrap();
        assert!(again.is_none());

        let authed = service.authenticate_by_token("bootstrap-token").await.unwrap();
        assert_eq!(authed.email, "root@example.com");
    }
}
