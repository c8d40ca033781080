//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, plus fixture builders for the ledger entities.

use anyhow::Result;
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement, Value,
};
use std::sync::Arc;
use tenancy_ledger::models::{electricity_type, lease_type, property, property_type, tenant};
use tenancy_ledger::repositories::{
    CreateLeaseRequest, CreatePropertyRequest, CreateTenantRequest, ElectricityTypeRepository,
    LeaseTypeRepository, PropertyRepository, PropertyTypeRepository, TenantRepository,
};
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool holds exactly one connection (each SQLite in-memory connection
/// is its own database). Foreign keys stay enforced so cascades can be tested.
pub async fn setup_test_db() -> Result<Arc<DatabaseConnection>> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    Ok(Arc::new(db))
}

/// One property with a single tenant, plus the lookups they need.
#[allow(dead_code)]
pub struct Fixture {
    pub property_type: property_type::Model,
    pub property: property::Model,
    pub lease_type: lease_type::Model,
    pub electricity_type: electricity_type::Model,
    pub tenant: tenant::Model,
}

#[allow(dead_code)]
impl Fixture {
    pub async fn build(db: &Arc<DatabaseConnection>) -> Result<Self> {
        let property_type = PropertyTypeRepository::new(db.clone()).create("Kost").await?;
        let lease_type = LeaseTypeRepository::new(db.clone())
            .create("Monthly", 30)
            .await?;
        let electricity_type = ElectricityTypeRepository::new(db.clone())
            .create("Prepaid")
            .await?;
        let property = create_property(db, property_type.id, "Kost Melati 3A").await?;
        let tenant = TenantRepository::new(db.clone())
            .create(tenant_request(property.id, "Budi Santoso", "budi@example.com"))
            .await?;

        Ok(Self {
            property_type,
            property,
            lease_type,
            electricity_type,
            tenant,
        })
    }

    /// An unpaid lease request for the fixture tenant and property.
    pub fn lease_request(&self, start: NaiveDate) -> CreateLeaseRequest {
        CreateLeaseRequest {
            tenant_id: self.tenant.id,
            property_id: self.property.id,
            lease_type_id: self.lease_type.id,
            start_date: start,
            end_date: start + chrono::Days::new(29),
            electricity_type_id: Some(self.electricity_type.id),
            watt: 900,
            is_payed: false,
        }
    }
}

#[allow(dead_code)]
pub async fn create_property(
    db: &Arc<DatabaseConnection>,
    property_type_id: Uuid,
    name: &str,
) -> Result<property::Model> {
    Ok(PropertyRepository::new(db.clone())
        .create(CreatePropertyRequest {
            name: name.to_string(),
            floor: 3,
            number: "A-3".to_string(),
            property_type_id,
            price: Decimal::new(150025, 2),
            created_by: "admin".to_string(),
        })
        .await?)
}

#[allow(dead_code)]
pub fn tenant_request(property_id: Uuid, name: &str, email: &str) -> CreateTenantRequest {
    CreateTenantRequest {
        name: name.to_string(),
        email: email.to_string(),
        phone_number: "081234567890".to_string(),
        property_id,
        password: "opaque-credential".to_string(),
        no_ktp: "3171234567890001".to_string(),
        created_by: None,
        is_active: None,
    }
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Inserts a lease with plain SQL, bypassing the repository.
#[allow(dead_code)]
pub async fn insert_raw_lease(
    db: &DatabaseConnection,
    fixture: &Fixture,
    start: NaiveDate,
    is_payed: bool,
) -> Result<Uuid, sea_orm::DbErr> {
    let id = Uuid::new_v4();
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO leases (id, tenant_id, property_id, lease_type_id, start_date, end_date, is_payed, electricity_type_id, watt) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            Value::from(id),
            Value::from(fixture.tenant.id),
            Value::from(fixture.property.id),
            Value::from(fixture.lease_type.id),
            Value::from(start),
            Value::from(start + chrono::Days::new(29)),
            Value::from(is_payed),
            Value::from(fixture.electricity_type.id),
            Value::from(900i32),
        ],
    );

    db.execute(stmt).await?;
    Ok(id)
}

/// Counts rows in `table` with the given tenant id.
#[allow(dead_code)]
pub async fn count_for_tenant(db: &DatabaseConnection, table: &str, tenant_id: Uuid) -> Result<i64> {
    let backend = db.get_database_backend();
    let placeholder = match backend {
        DbBackend::Postgres => "$1",
        _ => "?",
    };
    let stmt = Statement::from_sql_and_values(
        backend,
        format!("SELECT COUNT(*) AS count FROM {table} WHERE tenant_id = {placeholder}"),
        [Value::from(tenant_id)],
    );

    let row = db
        .query_one(stmt)
        .await?
        .ok_or_else(|| anyhow::anyhow!("COUNT returned no row"))?;
    Ok(row.try_get("", "count")?)
}
