//! Test utilities for database operations.
//!
//! Provides a migrated, in-memory SQLite database so that repository and
//! service tests can exercise real queries without an external server.

use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Set,
    Statement,
};
use std::sync::Arc;
use tracing::info;

use crate::entities::{asset, category, department, user};

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database URL.
    pub url: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Whether this config points at an in-memory SQLite database.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Create a fresh in-memory database with all migrations applied.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig {
            url: "sqlite::memory:".to_string(),
        })
        .await
    }

    /// Create a test database from a custom configuration and migrate it.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(&config.url);
        if config.is_memory() {
            // Every pooled connection would otherwise see its own empty database
            opt.max_connections(1).min_connections(1);
        }
        opt.sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        {
            use sea_orm_migration::MigratorTrait;
            crate::migrations::Migrator::up(&conn, None).await?;
        }

        info!(url = %config.url, "Created test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Count rows in `table`.
    pub async fn count_rows(&self, table: &str) -> Result<i64, DbErr> {
        let backend = self.conn.get_database_backend();
        let row = self
            .conn
            .query_one(Statement::from_string(
                backend,
                format!("SELECT COUNT(*) AS n FROM \"{table}\""),
            ))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(table.to_string()))?;
        row.try_get::<i64>("", "n")
    }

    /// Insert a user fixture.
    pub async fn insert_user(&self, id: &str, email: &str, is_admin: bool) -> Result<user::Model, DbErr> {
        let now = chrono::Utc::now();
        user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.to_string()),
            name: Set(None),
            token: Set(Some(format!("token-{id}"))),
            is_admin: Set(is_admin),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert an asset fixture owned by `owner_id`.
    pub async fn insert_asset(
        &self,
        id: &str,
        owner_id: &str,
        name: &str,
        cost_cents: i64,
    ) -> Result<asset::Model, DbErr> {
        let now = chrono::Utc::now();
        asset::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            cost_cents: Set(cost_cents),
            category_id: Set(None),
            department_id: Set(None),
            purchase_date: Set(None),
            owner_id: Set(owner_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a category fixture.
    pub async fn insert_category(&self, id: &str, name: &str) -> Result<category::Model, DbErr> {
        category::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a department fixture.
    pub async fn insert_department(&self, id: &str, name: &str) -> Result<department::Model, DbErr> {
        department::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(self.conn.as_ref())
        .await
    }
}
