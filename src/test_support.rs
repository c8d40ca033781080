//! Shared helpers for unit tests: a migrated in-memory SQLite database and
//! a minimal set of related records.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{electricity_type, lease_type, property, property_type, tenant};
use crate::repositories::{
    CreateLeaseRequest, CreatePropertyRequest, CreateTenantRequest, ElectricityTypeRepository,
    LeaseTypeRepository, PropertyRepository, PropertyTypeRepository, TenantRepository,
};

/// Opens a single-connection in-memory SQLite database with all migrations
/// applied. Foreign keys are enforced, so cascades behave as on Postgres.
pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to in-memory SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to apply migrations");

    Arc::new(db)
}

pub struct TestFixture {
    pub property_type: property_type::Model,
    pub property: property::Model,
    pub lease_type: lease_type::Model,
    pub electricity_type: electricity_type::Model,
    pub tenant: tenant::Model,
}

impl TestFixture {
    pub async fn build(db: &Arc<DatabaseConnection>) -> Self {
        let property_type = PropertyTypeRepository::new(db.clone())
            .create("Kost")
            .await
            .expect("create property type");
        let lease_type = LeaseTypeRepository::new(db.clone())
            .create("Monthly", 30)
            .await
            .expect("create lease type");
        let electricity_type = ElectricityTypeRepository::new(db.clone())
            .create("Prepaid")
            .await
            .expect("create electricity type");
        let property = PropertyRepository::new(db.clone())
            .create(CreatePropertyRequest {
                name: "Kost Melati 3A".to_string(),
                floor: 3,
                number: "A-3".to_string(),
                property_type_id: property_type.id,
                price: Decimal::new(150025, 2),
                created_by: "admin".to_string(),
            })
            .await
            .expect("create property");
        let tenant = TenantRepository::new(db.clone())
            .create(tenant_request(property.id, "Budi Santoso", "budi@example.com"))
            .await
            .expect("create tenant");

        Self {
            property_type,
            property,
            lease_type,
            electricity_type,
            tenant,
        }
    }

    /// An unpaid lease request for the fixture tenant starting on `start`.
    pub fn lease_request(&self, start: NaiveDate) -> CreateLeaseRequest {
        CreateLeaseRequest {
            tenant_id: self.tenant.id,
            property_id: self.property.id,
            lease_type_id: self.lease_type.id,
            start_date: start,
            end_date: self.lease_type.term_end(start).expect("term end"),
            electricity_type_id: Some(self.electricity_type.id),
            watt: 900,
            is_payed: false,
        }
    }
}

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

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
