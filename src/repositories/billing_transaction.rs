//! # Billing Transaction Repository
//!
//! A transaction freezes one billing cycle for a tenant. Names, the property
//! price and every charge amount are copied in when it is created, and the
//! stored totals are never recomputed afterwards, so later changes to bills,
//! tenants or properties leave existing transactions untouched.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::billing_transaction::{self, Entity as BillingTransaction};
use crate::models::lease::{self, Entity as Lease};
use crate::models::payed_type::Entity as PayedType;
use crate::models::property::Entity as Property;
use crate::models::tax::Entity as Tax;
use crate::models::tenant::Entity as Tenant;
use crate::repositories::bill::{BillRepository, BillingPeriod};
use crate::validation::{self, LEDGER_MONEY, PROPERTY_NAME_MAX, TENANT_NAME_MAX};

/// The six charge amounts of one billing cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChargeAmounts {
    pub electricity: Decimal,
    pub water: Decimal,
    pub maintenance: Decimal,
    pub penalty: Decimal,
    pub troubleshoot: Decimal,
    pub tax: Decimal,
}

impl ChargeAmounts {
    fn validate(&self) -> LedgerResult<()> {
        validation::amount("electricity_bill", self.electricity, LEDGER_MONEY)?;
        validation::amount("water_bill", self.water, LEDGER_MONEY)?;
        validation::amount("maintenance_bill", self.maintenance, LEDGER_MONEY)?;
        validation::amount("penalty_bill", self.penalty, LEDGER_MONEY)?;
        validation::amount("troubleshoot_bill", self.troubleshoot, LEDGER_MONEY)?;
        validation::amount("tax_bill", self.tax, LEDGER_MONEY)?;
        Ok(())
    }

    pub fn sum(&self) -> Decimal {
        self.electricity + self.water + self.maintenance + self.penalty + self.troubleshoot + self.tax
    }
}

/// Sub total, discount and grand total of a billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingTotals {
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub grand_total: Decimal,
}

impl BillingTotals {
    /// `sub_total` is the sum of all six charges; `grand_total` is
    /// `sub_total - discount`. The discount may not be negative or exceed
    /// the sub total.
    pub fn compute(amounts: &ChargeAmounts, discount: Option<Decimal>) -> LedgerResult<Self> {
        let sub_total = amounts.sum();
        let discount = discount.unwrap_or(Decimal::ZERO);

        if discount.is_sign_negative() && !discount.is_zero() {
            return Err(LedgerError::validation("discount", "must not be negative"));
        }
        if discount > sub_total {
            return Err(LedgerError::validation(
                "discount",
                format!("must not exceed the sub total ({sub_total})"),
            ));
        }

        Ok(Self {
            sub_total,
            discount,
            grand_total: sub_total - discount,
        })
    }
}

/// Request data for storing a transaction with caller-supplied values
#[derive(Debug, Clone)]
pub struct CreateTransactionRequest {
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub property_name: String,
    pub property_price: Decimal,
    pub electricity_type_id: Uuid,
    pub amounts: ChargeAmounts,
    pub sub_total_bill: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub grand_total: Option<Decimal>,
    pub payed_type_id: Option<Uuid>,
    pub due_date: NaiveDate,
    pub payed_date: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
}

/// Request data for building a transaction from the tenant's records
#[derive(Debug, Clone)]
pub struct ComposeTransactionRequest {
    pub tenant_id: Uuid,
    /// Bills dated within this period are charged
    pub period: BillingPeriod,
    pub due_date: NaiveDate,
    /// Defaults to the electricity type of the tenant's latest lease
    pub electricity_type_id: Option<Uuid>,
    /// Tax rate applied to the sum of the bill categories; no tax when unset
    pub tax_id: Option<Uuid>,
    pub discount: Option<Decimal>,
    pub created_by: Option<Uuid>,
}

/// Repository for billing transaction database operations
#[derive(Debug, Clone)]
pub struct BillingTransactionRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl BillingTransactionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Stores a transaction exactly as supplied.
    ///
    /// The totals are optional and independent; when all three are given
    /// they must satisfy `grand_total = sub_total_bill - discount`.
    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> LedgerResult<billing_transaction::Model> {
        let tenant_name = validation::text("tenant_name", &request.tenant_name, TENANT_NAME_MAX)?;
        let property_name =
            validation::text("property_name", &request.property_name, PROPERTY_NAME_MAX)?;
        let property_price =
            validation::amount("property_price", request.property_price, LEDGER_MONEY)?;
        request.amounts.validate()?;
        let sub_total_bill = optional_amount("sub_total_bill", request.sub_total_bill)?;
        let discount = optional_amount("discount", request.discount)?;
        let grand_total = optional_amount("grand_total", request.grand_total)?;

        if let (Some(sub_total), Some(discount), Some(grand_total)) =
            (sub_total_bill, discount, grand_total)
        {
            if grand_total != sub_total - discount {
                return Err(LedgerError::validation(
                    "grand_total",
                    format!("must equal sub_total_bill - discount ({})", sub_total - discount),
                ));
            }
        }

        let amounts = request.amounts;
        let transaction = billing_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(request.tenant_id),
            tenant_name: Set(tenant_name),
            property_name: Set(property_name),
            property_price: Set(property_price),
            electricity_type_id: Set(request.electricity_type_id),
            electricity_bill: Set(amounts.electricity),
            water_bill: Set(amounts.water),
            maintenance_bill: Set(amounts.maintenance),
            penalty_bill: Set(amounts.penalty),
            troubleshoot_bill: Set(amounts.troubleshoot),
            tax_bill: Set(amounts.tax),
            sub_total_bill: Set(sub_total_bill),
            discount: Set(discount),
            grand_total: Set(grand_total),
            payed_type_id: Set(request.payed_type_id),
            due_date: Set(request.due_date),
            payed_date: Set(request.payed_date),
            created_at: Set(Utc::now().into()),
            created_by: Set(request.created_by),
        }
        .insert(&*self.db)
        .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            tenant_id = %transaction.tenant_id,
            "Transaction recorded"
        );
        Ok(transaction)
    }

    /// Builds and stores a transaction from the tenant's current records:
    /// tenant and property details, bills dated within the period, and the
    /// optional tax rate.
    pub async fn compose_for_tenant(
        &self,
        request: ComposeTransactionRequest,
    ) -> LedgerResult<billing_transaction::Model> {
        let tenant = Tenant::find_by_id(request.tenant_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("tenant", request.tenant_id))?;
        let property = Property::find_by_id(tenant.property_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("property", tenant.property_id))?;

        let electricity_type_id = match request.electricity_type_id {
            Some(id) => id,
            None => self.latest_electricity_type(tenant.id).await?.ok_or_else(|| {
                LedgerError::validation(
                    "electricity_type_id",
                    "not given and none recorded on the tenant's leases",
                )
            })?,
        };

        let bills = BillRepository::new(self.db.clone())
            .totals_for_tenant(tenant.id, request.period)
            .await?;

        let tax = match request.tax_id {
            Some(tax_id) => Tax::find_by_id(tax_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| LedgerError::not_found("tax", tax_id))?
                .amount_on(bills.total()),
            None => Decimal::ZERO,
        };

        let amounts = ChargeAmounts {
            electricity: bills.electricity,
            water: bills.water,
            maintenance: bills.maintenance,
            penalty: bills.penalty,
            troubleshoot: bills.troubleshoot,
            tax,
        };
        let totals = BillingTotals::compute(&amounts, request.discount)?;

        self.create(CreateTransactionRequest {
            tenant_id: tenant.id,
            tenant_name: tenant.name,
            property_name: property.name,
            property_price: property.price,
            electricity_type_id,
            amounts,
            sub_total_bill: Some(totals.sub_total),
            discount: Some(totals.discount),
            grand_total: Some(totals.grand_total),
            payed_type_id: None,
            due_date: request.due_date,
            payed_date: None,
            created_by: request.created_by,
        })
        .await
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<billing_transaction::Model> {
        BillingTransaction::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("transaction", id))
    }

    /// Lists a tenant's transactions by due date, latest first.
    pub async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
    ) -> LedgerResult<Vec<billing_transaction::Model>> {
        Ok(BillingTransaction::find()
            .filter(billing_transaction::Column::TenantId.eq(tenant_id))
            .order_by_desc(billing_transaction::Column::DueDate)
            .all(&*self.db)
            .await?)
    }

    /// Lists transactions without a payment date, earliest due first.
    pub async fn list_unpaid(&self) -> LedgerResult<Vec<billing_transaction::Model>> {
        Ok(BillingTransaction::find()
            .filter(billing_transaction::Column::PayedDate.is_null())
            .order_by_asc(billing_transaction::Column::DueDate)
            .all(&*self.db)
            .await?)
    }

    /// Records payment of a transaction. Amounts and totals are left as stored.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        payed_type_id: Uuid,
        payed_date: NaiveDate,
    ) -> LedgerResult<billing_transaction::Model> {
        let transaction = self.get(id).await?;
        if transaction.is_paid() {
            return Err(LedgerError::validation("payed_date", "transaction is already paid"));
        }
        if PayedType::find_by_id(payed_type_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(LedgerError::ReferentialIntegrity(format!(
                "payment type {payed_type_id} does not exist"
            )));
        }

        let mut active = transaction.into_active_model();
        active.payed_type_id = Set(Some(payed_type_id));
        active.payed_date = Set(Some(payed_date));
        let paid = active.update(&*self.db).await?;

        tracing::info!(transaction_id = %paid.id, %payed_date, "Transaction paid");
        Ok(paid)
    }

    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = BillingTransaction::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("transaction", id));
        }
        Ok(())
    }

    async fn latest_electricity_type(&self, tenant_id: Uuid) -> LedgerResult<Option<Uuid>> {
        Ok(Lease::find()
            .filter(lease::Column::TenantId.eq(tenant_id))
            .filter(lease::Column::ElectricityTypeId.is_not_null())
            .order_by_desc(lease::Column::StartDate)
            .one(&*self.db)
            .await?
            .and_then(|lease| lease.electricity_type_id))
    }
}

fn optional_amount(field: &'static str, value: Option<Decimal>) -> LedgerResult<Option<Decimal>> {
    value
        .map(|amount| validation::amount(field, amount, LEDGER_MONEY))
        .transpose()
}
