//! Bill entities
//!
//! Each charge category lives in its own table with an identical shape.
//! [`BillCategory`] names the table and [`BillRecord`] is the
//! category-tagged view the repository hands back.

use std::fmt;
use std::str::FromStr;

use sea_orm::prelude::{Date, DateTimeWithTimeZone, Decimal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod electricity_bill;
pub mod maintenance_bill;
pub mod penalty_bill;
pub mod troubleshoot_bill;
pub mod water_bill;

/// The five charge categories billed to tenants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillCategory {
    Electricity,
    Water,
    Maintenance,
    Penalty,
    Troubleshoot,
}

impl BillCategory {
    pub const ALL: [BillCategory; 5] = [
        BillCategory::Electricity,
        BillCategory::Water,
        BillCategory::Maintenance,
        BillCategory::Penalty,
        BillCategory::Troubleshoot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillCategory::Electricity => "electricity",
            BillCategory::Water => "water",
            BillCategory::Maintenance => "maintenance",
            BillCategory::Penalty => "penalty",
            BillCategory::Troubleshoot => "troubleshoot",
        }
    }

    /// Human-readable label, e.g. "Water Bill".
    pub fn label(&self) -> &'static str {
        match self {
            BillCategory::Electricity => "Electricity Bill",
            BillCategory::Water => "Water Bill",
            BillCategory::Maintenance => "Maintenance Bill",
            BillCategory::Penalty => "Penalty Bill",
            BillCategory::Troubleshoot => "Troubleshoot Bill",
        }
    }
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BillCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown bill category '{value}'"))
    }
}

/// A bill row from any of the category tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRecord {
    pub id: Uuid,
    pub category: BillCategory,
    pub tenant_id: Uuid,
    pub date: Date,
    pub price: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Water".parse::<BillCategory>(), Ok(BillCategory::Water));
        assert_eq!(
            " troubleshoot ".parse::<BillCategory>(),
            Ok(BillCategory::Troubleshoot)
        );
        assert!("rent".parse::<BillCategory>().is_err());
    }

    #[test]
    fn category_labels() {
        assert_eq!(BillCategory::Penalty.label(), "Penalty Bill");
        assert_eq!(BillCategory::Electricity.to_string(), "electricity");
    }
}
