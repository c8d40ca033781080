//! Lease admission against a real Postgres instance.
//!
//! These tests use testcontainers, so they are ignored unless Docker is
//! available: `cargo test --test postgres_race_tests -- --ignored`.

use std::sync::Arc;

use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value};
use tenancy_ledger::{config::AppConfig, db, error::LedgerError, error::is_unique_violation};
use tenancy_ledger::repositories::LeaseRepository;
use testcontainers_modules::{postgres::Postgres, testcontainers::runners::AsyncRunner};
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{Fixture, count_for_tenant, date};

async fn connect(url: String) -> Result<Arc<DatabaseConnection>> {
    let config = AppConfig {
        database_url: url,
        db_max_connections: 16,
        ..AppConfig::default()
    };

    let conn = db::init_pool(&config).await?;
    db::run_migrations(&conn).await?;
    Ok(Arc::new(conn))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires docker"]
async fn concurrent_admissions_admit_exactly_one() -> Result<()> {
    let container = Postgres::default().start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db = connect(format!("postgres://postgres:postgres@{host}:{port}/postgres")).await?;

    let fixture = Fixture::build(&db).await?;
    let leases = LeaseRepository::new(db.clone());

    let mut handles = Vec::new();
    for day in 1..=16 {
        let repo = leases.clone();
        let request = fixture.lease_request(date(2025, 1, day));
        handles.push(tokio::spawn(async move { repo.create(request).await }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => admitted += 1,
            Err(LedgerError::InvariantViolation { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(count_for_tenant(&db, "leases", fixture.tenant.id).await?, 1);
    assert!(leases.find_invariant_breaches().await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn partial_index_rejects_raw_second_unpaid_lease() -> Result<()> {
    let container = Postgres::default().start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db = connect(format!("postgres://postgres:postgres@{host}:{port}/postgres")).await?;

    let fixture = Fixture::build(&db).await?;
    let insert = |start, is_payed: bool| {
        Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO leases (id, tenant_id, property_id, lease_type_id, start_date, end_date, is_payed, electricity_type_id, watt) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            [
                Value::from(Uuid::new_v4()),
                Value::from(fixture.tenant.id),
                Value::from(fixture.property.id),
                Value::from(fixture.lease_type.id),
                Value::from(start),
                Value::from(start),
                Value::from(is_payed),
                Value::from(fixture.electricity_type.id),
                Value::from(900i32),
            ],
        )
    };

    db.execute(insert(date(2025, 1, 1), false)).await?;
    let err = db
        .execute(insert(date(2025, 2, 1), false))
        .await
        .expect_err("second unpaid lease must violate the index");
    assert!(is_unique_violation(&err), "unexpected error: {err}");

    db.execute(insert(date(2025, 3, 1), true)).await?;
    assert_eq!(count_for_tenant(&db, "leases", fixture.tenant.id).await?, 2);
    Ok(())
}
