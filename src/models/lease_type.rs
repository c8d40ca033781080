//! LeaseType lookup entity
//!
//! A named lease term (daily, monthly, ...) carrying its length in days.

use std::fmt;

use chrono::{Days, NaiveDate};
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lease_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Length of one lease term in days
    pub number_of_days: i32,
}

impl Model {
    /// Last day of a term of this type starting on `start`.
    ///
    /// A one-day term ends on its start date. Returns `None` on calendar overflow.
    pub fn term_end(&self, start: NaiveDate) -> Option<NaiveDate> {
        let days = u64::try_from(self.number_of_days.max(1) - 1).ok()?;
        start.checked_add_days(Days::new(days))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease_type(days: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            name: "Monthly".to_string(),
            number_of_days: days,
        }
    }

    #[test]
    fn term_end_counts_start_day() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert_eq!(
            lease_type(30).term_end(start),
            NaiveDate::from_ymd_opt(2025, 1, 30)
        );
        assert_eq!(lease_type(1).term_end(start), Some(start));
    }
}
