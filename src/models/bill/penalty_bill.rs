//! Penalty charge (late payment, damage, ...) entity

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::{Date, DateTimeWithTimeZone};

use super::{BillCategory, BillRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "penalty_bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub date: Date,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::models::tenant::Entity",
        from = "Column::TenantId",
        to = "crate::models::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<crate::models::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BillRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            category: BillCategory::Penalty,
            tenant_id: model.tenant_id,
            date: model.date,
            price: model.price,
            created_at: model.created_at,
            created_by: model.created_by,
        }
    }
}
