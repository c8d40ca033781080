//! Migration to create the transactions table.
//!
//! A transaction is a billing-cycle snapshot: tenant and property details and
//! every charge category are copied in at creation, so later edits to the
//! source rows never change a stored transaction.

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
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(Transactions::TenantName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::PropertyName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(money(manager, Transactions::PropertyPrice).not_null())
                    .col(
                        ColumnDef::new(Transactions::ElectricityTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(money(manager, Transactions::ElectricityBill).not_null())
                    .col(money(manager, Transactions::WaterBill).not_null())
                    .col(money(manager, Transactions::MaintenanceBill).not_null())
                    .col(money(manager, Transactions::PenaltyBill).not_null())
                    .col(money(manager, Transactions::TroubleshootBill).not_null())
                    .col(money(manager, Transactions::TaxBill).not_null())
                    .col(money(manager, Transactions::SubTotalBill).null())
                    .col(money(manager, Transactions::Discount).null())
                    .col(money(manager, Transactions::GrandTotal).null())
                    .col(ColumnDef::new(Transactions::PayedTypeId).uuid().null())
                    .col(ColumnDef::new(Transactions::DueDate).date().not_null())
                    .col(ColumnDef::new(Transactions::PayedDate).date().null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Transactions::CreatedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_tenant_id")
                            .from(Transactions::Table, Transactions::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_electricity_type_id")
                            .from(Transactions::Table, Transactions::ElectricityTypeId)
                            .to(ElectricityTypes::Table, ElectricityTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_payed_type_id")
                            .from(Transactions::Table, Transactions::PayedTypeId)
                            .to(PayedTypes::Table, PayedTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_created_by")
                            .from(Transactions::Table, Transactions::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_tenant_id")
                    .table(Transactions::Table)
                    .col(Transactions::TenantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_transactions_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

fn money(manager: &SchemaManager, column: Transactions) -> ColumnDef {
    decimal_column(manager, column, 30, 2)
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    TenantId,
    TenantName,
    PropertyName,
    PropertyPrice,
    ElectricityTypeId,
    ElectricityBill,
    WaterBill,
    MaintenanceBill,
    PenaltyBill,
    TroubleshootBill,
    TaxBill,
    SubTotalBill,
    Discount,
    GrandTotal,
    PayedTypeId,
    DueDate,
    PayedDate,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ElectricityTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum PayedTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
