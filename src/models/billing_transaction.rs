//! Billing transaction entity model
//!
//! A transaction is a snapshot of one billing cycle. Tenant and property
//! details and each charge amount are copied in when the row is created;
//! the stored totals are never recomputed from the bill tables.

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::{Date, DateTimeWithTimeZone};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant billed by this transaction
    pub tenant_id: Uuid,

    /// Tenant name at billing time
    pub tenant_name: String,

    /// Property name at billing time
    pub property_name: String,

    /// Property rent price at billing time
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub property_price: Decimal,

    /// Electricity metering type billed
    pub electricity_type_id: Uuid,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub electricity_bill: Decimal,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub water_bill: Decimal,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub maintenance_bill: Decimal,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub penalty_bill: Decimal,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub troubleshoot_bill: Decimal,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub tax_bill: Decimal,

    /// Sum of the six charge categories, as supplied at creation
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub sub_total_bill: Option<Decimal>,

    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub discount: Option<Decimal>,

    /// `sub_total_bill - discount`, as supplied at creation
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub grand_total: Option<Decimal>,

    /// How the transaction was paid, once it is
    pub payed_type_id: Option<Uuid>,

    pub due_date: Date,

    pub payed_date: Option<Date>,

    /// Timestamp when the transaction was created
    pub created_at: DateTimeWithTimeZone,

    /// Operator who created the transaction
    pub created_by: Option<Uuid>,
}

impl Model {
    pub fn is_paid(&self) -> bool {
        self.payed_date.is_some()
    }
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
        belongs_to = "super::electricity_type::Entity",
        from = "Column::ElectricityTypeId",
        to = "super::electricity_type::Column::Id",
        on_delete = "Cascade"
    )]
    ElectricityType,
    #[sea_orm(
        belongs_to = "super::payed_type::Entity",
        from = "Column::PayedTypeId",
        to = "super::payed_type::Column::Id",
        on_delete = "Cascade"
    )]
    PayedType,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::electricity_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectricityType.def()
    }
}

impl Related<super::payed_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayedType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transaction - {}", self.id)
    }
}
