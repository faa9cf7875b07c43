//! Create department table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Department::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Department::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Department::Description).text())
                    .col(
                        ColumnDef::new(Department::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_department_name")
                    .table(Department::Table)
                    .col(Department::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Department {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}
