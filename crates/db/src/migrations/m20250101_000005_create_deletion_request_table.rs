//! Create `deletion_request` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeletionRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeletionRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeletionRequest::AssetId).string_len(32))
                    .col(
                        ColumnDef::new(DeletionRequest::AssetName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletionRequest::AssetCostCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletionRequest::RequestedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletionRequest::RequesterEmail)
                            .string_len(320)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeletionRequest::Justification).text().not_null())
                    .col(
                        ColumnDef::new(DeletionRequest::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(DeletionRequest::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(DeletionRequest::ReviewerEmail).string_len(320))
                    .col(ColumnDef::new(DeletionRequest::ReviewComment).text())
                    .col(ColumnDef::new(DeletionRequest::ReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DeletionRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DeletionRequest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(DeletionRequest::Status).is_in([
                        "pending",
                        "approved",
                        "rejected",
                        "cancelled",
                    ]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deletion_request_asset")
                            .from(DeletionRequest::Table, DeletionRequest::AssetId)
                            .to(Asset::Table, Asset::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deletion_request_requester")
                            .from(DeletionRequest::Table, DeletionRequest::RequestedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deletion_request_reviewer")
                            .from(DeletionRequest::Table, DeletionRequest::ReviewedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: requested_by (for "my requests")
        manager
            .create_index(
                Index::create()
                    .name("idx_deletion_request_requested_by")
                    .table(DeletionRequest::Table)
                    .col(DeletionRequest::RequestedBy)
                    .to_owned(),
            )
            .await?;

        // Index: status (for the admin queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_deletion_request_status")
                    .table(DeletionRequest::Table)
                    .col(DeletionRequest::Status)
                    .to_owned(),
            )
            .await?;

        // Partial unique index: at most one pending request per asset.
        // Same syntax on PostgreSQL and SQLite.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_deletion_request_one_pending
                ON deletion_request (asset_id)
                WHERE status = 'pending';
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeletionRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DeletionRequest {
    Table,
    Id,
    AssetId,
    AssetName,
    AssetCostCents,
    RequestedBy,
    RequesterEmail,
    Justification,
    Status,
    ReviewedBy,
    ReviewerEmail,
    ReviewComment,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Asset {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
