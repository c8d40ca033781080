//! Tenant entity model
//!
//! This module contains the SeaORM entity model for the tenants table.
//! A tenant occupies a single property at a time; tenancy periods are
//! recorded as leases.

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Tenant entity representing a person renting a property
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Full name of the tenant
    pub name: String,

    /// Contact email, unique across tenants
    #[sea_orm(unique)]
    pub email: String,

    /// Contact phone number
    pub phone_number: String,

    /// Property the tenant currently occupies
    pub property_id: Uuid,

    /// Opaque credential issued by the authentication service
    pub password: String,

    /// Timestamp when the tenant was created
    pub created_at: DateTimeWithTimeZone,

    /// Operator who registered the tenant, cleared if that user is deleted
    pub created_by: Option<Uuid>,

    /// Whether the tenant is currently active
    pub is_active: bool,

    /// National identity card number
    pub no_ktp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::lease::Entity")]
    Lease,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lease.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
