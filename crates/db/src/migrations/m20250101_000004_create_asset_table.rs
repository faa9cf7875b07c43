//! Create asset table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Asset::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Asset::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Asset::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Asset::CostCents).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Asset::CategoryId).string_len(32))
                    .col(ColumnDef::new(Asset::DepartmentId).string_len(32))
                    .col(ColumnDef::new(Asset::PurchaseDate).date())
                    .col(ColumnDef::new(Asset::OwnerId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Asset::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Asset::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Asset::CostCents).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_owner")
                            .from(Asset::Table, Asset::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_category")
                            .from(Asset::Table, Asset::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_department")
                            .from(Asset::Table, Asset::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: owner_id (for "my assets")
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_owner_id")
                    .table(Asset::Table)
                    .col(Asset::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index: category_id (for filtering and reference checks)
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_category_id")
                    .table(Asset::Table)
                    .col(Asset::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: department_id
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_department_id")
                    .table(Asset::Table)
                    .col(Asset::DepartmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Asset::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Asset {
    Table,
    Id,
    Name,
    CostCents,
    CategoryId,
    DepartmentId,
    PurchaseDate,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}

#[derive(Iden)]
enum Department {
    Table,
    Id,
}
