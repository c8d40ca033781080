//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for ledger entities. Every operation returns
//! [`LedgerResult`](crate::error::LedgerResult).

pub mod bill;
pub mod billing_transaction;
pub mod lease;
pub mod lookup;
pub mod property;
pub mod tenant;
pub mod troubleshoot;
pub mod user;

pub use bill::{BillRepository, BillingPeriod, CategoryTotals, CreateBillRequest};
pub use billing_transaction::{
    BillingTotals, BillingTransactionRepository, ChargeAmounts, ComposeTransactionRequest,
    CreateTransactionRequest,
};
pub use lease::{CreateLeaseRequest, InvariantBreach, LeaseRepository, UpdateLeaseRequest};
pub use lookup::{
    ElectricityTypeRepository, LeaseTypeRepository, PayedTypeRepository, PropertyTypeRepository,
    TaxRepository,
};
pub use property::{CreatePropertyRequest, PropertyRepository, UpdatePropertyRequest};
pub use tenant::{CreateTenantRequest, TenantRepository, UpdateTenantRequest};
pub use troubleshoot::{CreateTroubleshootRequest, TroubleshootRepository, TroubleshootWithImages};
pub use user::UserRepository;
