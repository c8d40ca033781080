//! Adds a partial unique index allowing at most one unpaid lease per tenant.
//!
//! The repository checks the rule inside a transaction; this index makes the
//! database reject a second unpaid lease even for writes that bypass it.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        match backend {
            DatabaseBackend::Postgres => {
                manager
                    .get_connection()
                    .execute(Statement::from_string(
                        backend,
                        "DO $$\nBEGIN\n    IF NOT EXISTS (\n        SELECT 1 FROM pg_indexes\n        WHERE schemaname = current_schema()\n          AND indexname = 'ux_leases_tenant_unpaid'\n    ) THEN\n        CREATE UNIQUE INDEX ux_leases_tenant_unpaid\n            ON leases (tenant_id)\n            WHERE NOT is_payed;\n    END IF;\nEND\n$$;"
                            .to_string(),
                    ))
                    .await
                    .map(|_| ())
            }
            _ => manager
                .get_connection()
                .execute(Statement::from_string(
                    backend,
                    "CREATE UNIQUE INDEX IF NOT EXISTS ux_leases_tenant_unpaid \
                     ON leases (tenant_id) \
                     WHERE NOT is_payed"
                        .to_string(),
                ))
                .await
                .map(|_| ()),
        }
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "DROP INDEX IF EXISTS ux_leases_tenant_unpaid",
            ))
            .await
            .map(|_| ())
    }
}
