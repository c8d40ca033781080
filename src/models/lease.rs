//! Lease entity model
//!
//! A lease records one tenancy period of a tenant at a property. At most one
//! lease per tenant may be unpaid; see
//! [`LeaseRepository`](crate::repositories::LeaseRepository) for the guard and
//! the `ux_leases_tenant_unpaid` index for the database-side backstop.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::Date;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    /// Unique identifier for the lease (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant holding the lease
    pub tenant_id: Uuid,

    /// Property being leased
    pub property_id: Uuid,

    /// Lease term type
    pub lease_type_id: Uuid,

    /// First day of the lease
    pub start_date: Date,

    /// Last day of the lease
    pub end_date: Date,

    /// Whether the lease has been paid
    pub is_payed: bool,

    /// Electricity metering type, if recorded
    pub electricity_type_id: Option<Uuid>,

    /// Contracted electrical capacity in watts
    pub watt: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::lease_type::Entity",
        from = "Column::LeaseTypeId",
        to = "super::lease_type::Column::Id",
        on_delete = "Cascade"
    )]
    LeaseType,
    #[sea_orm(
        belongs_to = "super::electricity_type::Entity",
        from = "Column::ElectricityTypeId",
        to = "super::electricity_type::Column::Id",
        on_delete = "Cascade"
    )]
    ElectricityType,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::lease_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaseType.def()
    }
}

impl Related<super::electricity_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectricityType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
