//! # Bill Repository
//!
//! One repository for the five per-category bill tables. Every operation
//! takes a [`BillCategory`] and dispatches to the matching entity; results
//! come back as category-tagged [`BillRecord`]s.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::bill::{BillCategory, BillRecord};
use crate::validation::{self, BILL_MONEY};

/// Runs `$body` with `$bill` bound to the entity module of `$category`.
macro_rules! with_bill_entity {
    ($category:expr, $bill:ident => $body:expr) => {
        match $category {
            BillCategory::Electricity => {
                use crate::models::bill::electricity_bill as $bill;
                $body
            }
            BillCategory::Water => {
                use crate::models::bill::water_bill as $bill;
                $body
            }
            BillCategory::Maintenance => {
                use crate::models::bill::maintenance_bill as $bill;
                $body
            }
            BillCategory::Penalty => {
                use crate::models::bill::penalty_bill as $bill;
                $body
            }
            BillCategory::Troubleshoot => {
                use crate::models::bill::troubleshoot_bill as $bill;
                $body
            }
        }
    };
}

/// Request data for recording a bill
#[derive(Debug, Clone)]
pub struct CreateBillRequest {
    pub category: BillCategory,
    pub tenant_id: Uuid,
    /// Date the charge applies to
    pub date: NaiveDate,
    pub price: Decimal,
    pub created_by: Option<Uuid>,
}

/// Inclusive date range used to select bills for a billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl BillingPeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> LedgerResult<Self> {
        if to < from {
            return Err(LedgerError::validation(
                "period",
                format!("ends ({to}) before it starts ({from})"),
            ));
        }
        Ok(Self { from, to })
    }
}

/// Per-category bill sums for one tenant over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub electricity: Decimal,
    pub water: Decimal,
    pub maintenance: Decimal,
    pub penalty: Decimal,
    pub troubleshoot: Decimal,
}

impl CategoryTotals {
    pub fn get(&self, category: BillCategory) -> Decimal {
        match category {
            BillCategory::Electricity => self.electricity,
            BillCategory::Water => self.water,
            BillCategory::Maintenance => self.maintenance,
            BillCategory::Penalty => self.penalty,
            BillCategory::Troubleshoot => self.troubleshoot,
        }
    }

    fn set(&mut self, category: BillCategory, amount: Decimal) {
        match category {
            BillCategory::Electricity => self.electricity = amount,
            BillCategory::Water => self.water = amount,
            BillCategory::Maintenance => self.maintenance = amount,
            BillCategory::Penalty => self.penalty = amount,
            BillCategory::Troubleshoot => self.troubleshoot = amount,
        }
    }

    /// Sum across all five categories.
    pub fn total(&self) -> Decimal {
        BillCategory::ALL.iter().map(|category| self.get(*category)).sum()
    }
}

/// Repository for bill database operations across all categories
#[derive(Debug, Clone)]
pub struct BillRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl BillRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CreateBillRequest) -> LedgerResult<BillRecord> {
        let price = validation::amount("price", request.price, BILL_MONEY)?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        let record: BillRecord = with_bill_entity!(request.category, bill => {
            bill::ActiveModel {
                id: Set(id),
                tenant_id: Set(request.tenant_id),
                date: Set(request.date),
                price: Set(price),
                created_at: Set(now.into()),
                created_by: Set(request.created_by),
            }
            .insert(&*self.db)
            .await?
            .into()
        });

        tracing::debug!(
            bill_id = %record.id,
            category = %record.category,
            tenant_id = %record.tenant_id,
            "Bill recorded"
        );
        Ok(record)
    }

    pub async fn get(&self, category: BillCategory, id: Uuid) -> LedgerResult<BillRecord> {
        let found: Option<BillRecord> = with_bill_entity!(category, bill => {
            bill::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .map(Into::into)
        });
        found.ok_or_else(|| LedgerError::not_found(category.label(), id))
    }

    /// Lists a tenant's bills of one category, oldest first, optionally
    /// limited to a billing period.
    pub async fn list_for_tenant(
        &self,
        category: BillCategory,
        tenant_id: Uuid,
        period: Option<BillingPeriod>,
    ) -> LedgerResult<Vec<BillRecord>> {
        let records: Vec<BillRecord> = with_bill_entity!(category, bill => {
            let mut query = bill::Entity::find().filter(bill::Column::TenantId.eq(tenant_id));
            if let Some(period) = period {
                query = query
                    .filter(bill::Column::Date.gte(period.from))
                    .filter(bill::Column::Date.lte(period.to));
            }
            query
                .order_by_asc(bill::Column::Date)
                .all(&*self.db)
                .await?
                .into_iter()
                .map(Into::into)
                .collect()
        });
        Ok(records)
    }

    /// Changes the date and/or price of a bill. Stored transactions are
    /// snapshots and are not affected.
    pub async fn update(
        &self,
        category: BillCategory,
        id: Uuid,
        date: Option<NaiveDate>,
        price: Option<Decimal>,
    ) -> LedgerResult<BillRecord> {
        let price = price
            .map(|price| validation::amount("price", price, BILL_MONEY))
            .transpose()?;

        let updated: Option<BillRecord> = with_bill_entity!(category, bill => {
            match bill::Entity::find_by_id(id).one(&*self.db).await? {
                Some(existing) => {
                    let mut active = existing.into_active_model();
                    if let Some(date) = date {
                        active.date = Set(date);
                    }
                    if let Some(price) = price {
                        active.price = Set(price);
                    }
                    Some(active.update(&*self.db).await?.into())
                }
                None => None,
            }
        });
        updated.ok_or_else(|| LedgerError::not_found(category.label(), id))
    }

    pub async fn delete(&self, category: BillCategory, id: Uuid) -> LedgerResult<()> {
        let rows_affected = with_bill_entity!(category, bill => {
            bill::Entity::delete_by_id(id).exec(&*self.db).await?.rows_affected
        });
        if rows_affected == 0 {
            return Err(LedgerError::not_found(category.label(), id));
        }
        Ok(())
    }

    /// Sum of one category's bills for a tenant within the period.
    pub async fn sum_for_tenant(
        &self,
        category: BillCategory,
        tenant_id: Uuid,
        period: BillingPeriod,
    ) -> LedgerResult<Decimal> {
        // Summed here rather than in SQL: SQLite stores decimals as REAL.
        let prices: Vec<Decimal> = with_bill_entity!(category, bill => {
            bill::Entity::find()
                .select_only()
                .column(bill::Column::Price)
                .filter(bill::Column::TenantId.eq(tenant_id))
                .filter(bill::Column::Date.gte(period.from))
                .filter(bill::Column::Date.lte(period.to))
                .into_tuple()
                .all(&*self.db)
                .await?
        });
        Ok(prices.into_iter().sum::<Decimal>().round_dp(2))
    }

    /// Per-category sums for a tenant within the period.
    pub async fn totals_for_tenant(
        &self,
        tenant_id: Uuid,
        period: BillingPeriod,
    ) -> LedgerResult<CategoryTotals> {
        let mut totals = CategoryTotals::default();
        for category in BillCategory::ALL {
            totals.set(category, self.sum_for_tenant(category, tenant_id, period).await?);
        }
        Ok(totals)
    }
}
