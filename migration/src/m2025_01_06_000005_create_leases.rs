//! Migration to create the leases table.
//!
//! A lease records one tenancy period of a tenant at a property. Every
//! reference cascades on delete, including the optional electricity type.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leases::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Leases::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Leases::LeaseTypeId).uuid().not_null())
                    .col(ColumnDef::new(Leases::StartDate).date().not_null())
                    .col(ColumnDef::new(Leases::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Leases::IsPayed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Leases::ElectricityTypeId).uuid().null())
                    .col(ColumnDef::new(Leases::Watt).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_tenant_id")
                            .from(Leases::Table, Leases::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_property_id")
                            .from(Leases::Table, Leases::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_lease_type_id")
                            .from(Leases::Table, Leases::LeaseTypeId)
                            .to(LeaseTypes::Table, LeaseTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_electricity_type_id")
                            .from(Leases::Table, Leases::ElectricityTypeId)
                            .to(ElectricityTypes::Table, ElectricityTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leases_tenant_id")
                    .table(Leases::Table)
                    .col(Leases::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leases_property_id")
                    .table(Leases::Table)
                    .col(Leases::PropertyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_leases_property_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_leases_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Leases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Leases {
    Table,
    Id,
    TenantId,
    PropertyId,
    LeaseTypeId,
    StartDate,
    EndDate,
    IsPayed,
    ElectricityTypeId,
    Watt,
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

#[derive(DeriveIden)]
enum LeaseTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ElectricityTypes {
    Table,
    Id,
}
