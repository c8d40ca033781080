//! # Data Models
//!
//! This module contains the SeaORM entities that make up the ledger schema.

pub mod bill;
pub mod billing_transaction;
pub mod electricity_type;
pub mod lease;
pub mod lease_type;
pub mod payed_type;
pub mod property;
pub mod property_type;
pub mod tax;
pub mod tenant;
pub mod troubleshoot;
pub mod troubleshoot_image;
pub mod user;

pub use bill::{BillCategory, BillRecord};
pub use billing_transaction::Entity as BillingTransaction;
pub use electricity_type::Entity as ElectricityType;
pub use lease::Entity as Lease;
pub use lease_type::Entity as LeaseType;
pub use payed_type::Entity as PayedType;
pub use property::Entity as Property;
pub use property_type::Entity as PropertyType;
pub use tax::Entity as Tax;
pub use tenant::Entity as Tenant;
pub use troubleshoot::Entity as Troubleshoot;
pub use troubleshoot_image::Entity as TroubleshootImage;
pub use user::Entity as User;
