//! Migration to create the properties table.

use sea_orm_migration::prelude::*;

use crate::decimal_column;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Properties::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Properties::Floor).integer().not_null())
                    .col(ColumnDef::new(Properties::Number).string_len(50).not_null())
                    .col(ColumnDef::new(Properties::PropertyTypeId).uuid().not_null())
                    .col(decimal_column(manager, Properties::Price, 30, 2).not_null())
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Properties::CreatedBy).string_len(255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_property_type_id")
                            .from(Properties::Table, Properties::PropertyTypeId)
                            .to(PropertyTypes::Table, PropertyTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_property_type_id")
                    .table(Properties::Table)
                    .col(Properties::PropertyTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_properties_property_type_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    Floor,
    Number,
    PropertyTypeId,
    Price,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum PropertyTypes {
    Table,
    Id,
}
