//! Migration to create the five bill tables.
//!
//! Electricity, water, maintenance, penalty and troubleshoot bills share one
//! shape: a dated charge against a tenant with optional creator metadata.

use sea_orm_migration::prelude::*;

/// Bill tables in creation order.
const BILL_TABLES: [&str; 5] = [
    "electricity_bills",
    "water_bills",
    "maintenance_bills",
    "penalty_bills",
    "troubleshoot_bills",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in BILL_TABLES {
            manager.create_table(bill_table(table)).await?;

            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_tenant_date"))
                        .table(Alias::new(table))
                        .col(Bill::TenantId)
                        .col(Bill::Date)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in BILL_TABLES.iter().rev() {
            manager
                .drop_index(Index::drop().name(format!("idx_{table}_tenant_date")).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

fn bill_table(table: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(ColumnDef::new(Bill::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Bill::TenantId).uuid().not_null())
        .col(ColumnDef::new(Bill::Date).date().not_null())
        .col(ColumnDef::new(Bill::Price).decimal_len(10, 2).not_null())
        .col(
            ColumnDef::new(Bill::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Bill::CreatedBy).uuid().null())
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_tenant_id"))
                .from(Alias::new(table), Bill::TenantId)
                .to(Tenants::Table, Tenants::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_created_by"))
                .from(Alias::new(table), Bill::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Bill {
    Id,
    TenantId,
    Date,
    Price,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
