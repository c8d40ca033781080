//! # Tenancy Ledger Library
//!
//! Persistence and business rules for a property-rental ledger: properties,
//! tenants, leases, per-category bills and billing transactions. The central
//! rule is that a tenant may hold at most one unpaid lease; see
//! [`repositories::LeaseRepository`].

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod telemetry;
pub mod validation;
pub use migration;

#[cfg(test)]
pub(crate) mod test_support;
