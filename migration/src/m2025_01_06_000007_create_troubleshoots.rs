//! Migration to create the troubleshoots and troubleshoot_images tables.
//!
//! Images hold only a reference into external binary storage.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Troubleshoots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Troubleshoots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Troubleshoots::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Troubleshoots::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Troubleshoots::Message).text().not_null())
                    .col(
                        ColumnDef::new(Troubleshoots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_troubleshoots_tenant_id")
                            .from(Troubleshoots::Table, Troubleshoots::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_troubleshoots_property_id")
                            .from(Troubleshoots::Table, Troubleshoots::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TroubleshootImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TroubleshootImages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TroubleshootImages::TroubleshootId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TroubleshootImages::Image)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_troubleshoot_images_troubleshoot_id")
                            .from(TroubleshootImages::Table, TroubleshootImages::TroubleshootId)
                            .to(Troubleshoots::Table, Troubleshoots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_troubleshoots_tenant_id")
                    .table(Troubleshoots::Table)
                    .col(Troubleshoots::TenantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_troubleshoots_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TroubleshootImages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Troubleshoots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Troubleshoots {
    Table,
    Id,
    TenantId,
    PropertyId,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TroubleshootImages {
    Table,
    Id,
    TroubleshootId,
    Image,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
}
