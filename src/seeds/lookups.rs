//! Lookup seeding functionality
//!
//! Populates the reference tables with the rows a fresh ledger needs before
//! properties, tenants and leases can be recorded.

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;

use crate::repositories::{
    ElectricityTypeRepository, LeaseTypeRepository, PayedTypeRepository, PropertyTypeRepository,
};

const PROPERTY_TYPES: &[&str] = &["Kost", "Apartment", "House"];
const ELECTRICITY_TYPES: &[&str] = &["Prepaid", "Postpaid"];
const PAYED_TYPES: &[&str] = &["Cash", "Bank Transfer", "E-Wallet"];
const LEASE_TYPES: &[(&str, i32)] = &[("Daily", 1), ("Weekly", 7), ("Monthly", 30), ("Yearly", 365)];

/// Counts of rows created and skipped by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Seeds the lookup tables with default rows.
///
/// Rows are matched by name, so running this repeatedly creates nothing new.
pub async fn seed_lookups(db: &DatabaseConnection) -> Result<SeedReport> {
    let db = Arc::new(db.clone());
    let mut report = SeedReport::default();

    let property_types = PropertyTypeRepository::new(db.clone());
    for name in PROPERTY_TYPES {
        if property_types.find_by_name(name).await?.is_some() {
            log::info!("Property type '{}' already exists, skipping", name);
            report.skipped += 1;
            continue;
        }
        property_types
            .create(name)
            .await
            .with_context(|| format!("Failed to create property type '{name}'"))?;
        log::info!("Created property type: {}", name);
        report.created += 1;
    }

    let electricity_types = ElectricityTypeRepository::new(db.clone());
    for name in ELECTRICITY_TYPES {
        if electricity_types.find_by_name(name).await?.is_some() {
            log::info!("Electricity type '{}' already exists, skipping", name);
            report.skipped += 1;
            continue;
        }
        electricity_types
            .create(name)
            .await
            .with_context(|| format!("Failed to create electricity type '{name}'"))?;
        log::info!("Created electricity type: {}", name);
        report.created += 1;
    }

    let payed_types = PayedTypeRepository::new(db.clone());
    for name in PAYED_TYPES {
        if payed_types.find_by_name(name).await?.is_some() {
            log::info!("Payment type '{}' already exists, skipping", name);
            report.skipped += 1;
            continue;
        }
        payed_types
            .create(name)
            .await
            .with_context(|| format!("Failed to create payment type '{name}'"))?;
        log::info!("Created payment type: {}", name);
        report.created += 1;
    }

    let lease_types = LeaseTypeRepository::new(db);
    for (name, days) in LEASE_TYPES {
        if lease_types.find_by_name(name).await?.is_some() {
            log::info!("Lease type '{}' already exists, skipping", name);
            report.skipped += 1;
            continue;
        }
        lease_types
            .create(name, *days)
            .await
            .with_context(|| format!("Failed to create lease type '{name}'"))?;
        log::info!("Created lease type: {} ({} days)", name, days);
        report.created += 1;
    }

    log::info!(
        "Lookup seeding completed: {} created, {} skipped",
        report.created,
        report.skipped
    );
    Ok(report)
}
