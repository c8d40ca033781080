//! Database migrations for the Tenancy Ledger.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

mod m2025_01_06_000001_create_users;
mod m2025_01_06_000002_create_lookup_tables;
mod m2025_01_06_000003_create_properties;
mod m2025_01_06_000004_create_tenants;
mod m2025_01_06_000005_create_leases;
mod m2025_01_06_000006_add_lease_unpaid_guard;
mod m2025_01_06_000007_create_troubleshoots;
mod m2025_01_06_000008_create_bills;
mod m2025_01_06_000009_create_transactions;

/// Name of the partial unique index backing the one-unpaid-lease-per-tenant rule.
pub const LEASE_UNPAID_GUARD_INDEX: &str = "ux_leases_tenant_unpaid";

/// Decimal column declared as `DECIMAL(precision, scale)` on Postgres.
///
/// SQLite rejects declared precisions above 16 and ignores them anyway, so
/// every other backend gets an unsized decimal column.
pub(crate) fn decimal_column<T: IntoIden>(
    manager: &SchemaManager,
    column: T,
    precision: u32,
    scale: u32,
) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    match manager.get_database_backend() {
        DatabaseBackend::Postgres => def.decimal_len(precision, scale),
        _ => def.decimal(),
    };
    def
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_06_000001_create_users::Migration),
            Box::new(m2025_01_06_000002_create_lookup_tables::Migration),
            Box::new(m2025_01_06_000003_create_properties::Migration),
            Box::new(m2025_01_06_000004_create_tenants::Migration),
            Box::new(m2025_01_06_000005_create_leases::Migration),
            Box::new(m2025_01_06_000006_add_lease_unpaid_guard::Migration),
            Box::new(m2025_01_06_000007_create_troubleshoots::Migration),
            Box::new(m2025_01_06_000008_create_bills::Migration),
            Box::new(m2025_01_06_000009_create_transactions::Migration),
        ]
    }
}
