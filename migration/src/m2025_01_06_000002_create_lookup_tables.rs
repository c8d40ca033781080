//! Migration to create the lookup tables.
//!
//! Property types, electricity types, lease types, payment types and tax
//! rates are plain reference tables owned by nobody and referenced by the
//! ledger entities.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PropertyTypes::Name).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ElectricityTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ElectricityTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ElectricityTypes::Name)
                            .string_len(50)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaseTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LeaseTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(LeaseTypes::Name).string_len(50).not_null())
                    .col(ColumnDef::new(LeaseTypes::NumberOfDays).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayedTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PayedTypes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PayedTypes::Name).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Taxes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Taxes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Taxes::Percent).decimal_len(5, 2).not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Taxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PayedTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaseTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ElectricityTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PropertyTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum ElectricityTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum LeaseTypes {
    Table,
    Id,
    Name,
    NumberOfDays,
}

#[derive(DeriveIden)]
enum PayedTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Taxes {
    Table,
    Id,
    Percent,
}
