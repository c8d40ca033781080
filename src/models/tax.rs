//! Tax rate entity

use std::fmt;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "taxes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Rate in percent, two decimal places
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub percent: Decimal,
}

impl Model {
    /// Tax owed on `base`, rounded to cents.
    pub fn amount_on(&self, base: Decimal) -> Decimal {
        (base * self.percent / Decimal::ONE_HUNDRED).round_dp(2)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% Tax", self.percent)
    }
}
