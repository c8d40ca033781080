//! Property entity model
//!
//! A rentable unit identified by name, floor and unit number.

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    /// Unique identifier for the property (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name of the property
    pub name: String,

    /// Floor the unit is on
    pub floor: i32,

    /// Unit number within the building
    pub number: String,

    /// Property type reference
    pub property_type_id: Uuid,

    /// Rent price
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub price: Decimal,

    /// Timestamp when the property was created
    pub created_at: DateTimeWithTimeZone,

    /// Free-text name of whoever registered the property
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property_type::Entity",
        from = "Column::PropertyTypeId",
        to = "super::property_type::Column::Id",
        on_delete = "Cascade"
    )]
    PropertyType,
    #[sea_orm(has_many = "super::tenant::Entity")]
    Tenant,
    #[sea_orm(has_many = "super::lease::Entity")]
    Lease,
}

impl Related<super::property_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyType.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
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
