//! # Lease Repository
//!
//! Leases are admitted under one rule: a tenant may hold at most one unpaid
//! lease at any time. Every write that can leave a lease unpaid runs inside a
//! transaction that first locks the tenant row (`SELECT ... FOR UPDATE` on
//! Postgres), so two concurrent admissions for the same tenant serialize on
//! that lock. The `ux_leases_tenant_unpaid` partial unique index rejects
//! anything that slips past, including writes made outside this repository.

use chrono::NaiveDate;
use metrics::counter;
use migration::LEASE_UNPAID_GUARD_INDEX;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult, is_unique_violation, violated_constraint};
use crate::models::lease::{self, Entity as Lease};
use crate::models::tenant::{self, Entity as Tenant};
use crate::validation;

/// Request data for admitting a new lease
#[derive(Debug, Clone)]
pub struct CreateLeaseRequest {
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub lease_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub electricity_type_id: Option<Uuid>,
    /// Contracted electrical capacity in watts
    pub watt: i32,
    /// New leases are normally unpaid
    pub is_payed: bool,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLeaseRequest {
    pub tenant_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub lease_type_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `Some(None)` clears the electricity type
    pub electricity_type_id: Option<Option<Uuid>>,
    pub watt: Option<i32>,
    pub is_payed: Option<bool>,
}

/// A tenant found holding more than one unpaid lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvariantBreach {
    pub tenant_id: Uuid,
    pub unpaid_leases: i64,
}

/// Repository for Lease database operations
#[derive(Debug, Clone)]
pub struct LeaseRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl LeaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Admits a new lease for the tenant.
    ///
    /// Fails with [`LedgerError::InvariantViolation`] when the new lease is
    /// unpaid and the tenant already holds an unpaid lease. Which property the
    /// existing lease is for does not matter. Paid leases are always admitted.
    #[instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
    pub async fn create(&self, request: CreateLeaseRequest) -> LedgerResult<lease::Model> {
        validate_term(request.start_date, request.end_date)?;
        let watt = validation::non_negative("watt", request.watt)?;

        let txn = self.db.begin().await?;
        let outcome = admit_new(&txn, request, watt).await;
        let lease = finish(txn, outcome).await?;

        info!(lease_id = %lease.id, is_payed = lease.is_payed, "Lease admitted");
        Ok(lease)
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<lease::Model> {
        Lease::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("lease", id))
    }

    pub async fn list(&self) -> LedgerResult<Vec<lease::Model>> {
        Ok(Lease::find()
            .order_by_desc(lease::Column::StartDate)
            .all(&*self.db)
            .await?)
    }

    /// Lists a tenant's leases, most recent first.
    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> LedgerResult<Vec<lease::Model>> {
        Ok(Lease::find()
            .filter(lease::Column::TenantId.eq(tenant_id))
            .order_by_desc(lease::Column::StartDate)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_for_property(&self, property_id: Uuid) -> LedgerResult<Vec<lease::Model>> {
        Ok(Lease::find()
            .filter(lease::Column::PropertyId.eq(property_id))
            .order_by_desc(lease::Column::StartDate)
            .all(&*self.db)
            .await?)
    }

    /// The tenant's unpaid lease, if any.
    pub async fn unpaid_for_tenant(&self, tenant_id: Uuid) -> LedgerResult<Option<lease::Model>> {
        Ok(Lease::find()
            .filter(lease::Column::TenantId.eq(tenant_id))
            .filter(lease::Column::IsPayed.eq(false))
            .one(&*self.db)
            .await?)
    }

    pub async fn count_for_tenant(&self, tenant_id: Uuid) -> LedgerResult<u64> {
        Ok(Lease::find()
            .filter(lease::Column::TenantId.eq(tenant_id))
            .count(&*self.db)
            .await?)
    }

    /// Updates a lease.
    ///
    /// When the lease ends up unpaid, the target tenant is checked the same
    /// way as on [`create`](Self::create), ignoring the lease itself.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: Uuid, request: UpdateLeaseRequest) -> LedgerResult<lease::Model> {
        if let Some(watt) = request.watt {
            validation::non_negative("watt", watt)?;
        }

        let txn = self.db.begin().await?;
        let outcome = apply_update(&txn, id, request).await;
        finish(txn, outcome).await
    }

    /// Flips the paid flag. Marking a lease paid never fails the guard;
    /// marking it unpaid again does when the tenant holds another unpaid lease.
    pub async fn set_paid(&self, id: Uuid, is_payed: bool) -> LedgerResult<lease::Model> {
        let lease = self
            .update(
                id,
                UpdateLeaseRequest {
                    is_payed: Some(is_payed),
                    ..Default::default()
                },
            )
            .await?;
        debug!(lease_id = %id, is_payed, "Lease payment status changed");
        Ok(lease)
    }

    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = Lease::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("lease", id));
        }
        Ok(())
    }

    /// Tenants holding more than one unpaid lease. Always empty while the
    /// guard and the partial index are in place.
    pub async fn find_invariant_breaches(&self) -> LedgerResult<Vec<InvariantBreach>> {
        let unpaid = Expr::col(lease::Column::Id).count();

        let rows: Vec<(Uuid, i64)> = Lease::find()
            .select_only()
            .column(lease::Column::TenantId)
            .column_as(unpaid.clone(), "unpaid_leases")
            .filter(lease::Column::IsPayed.eq(false))
            .group_by(lease::Column::TenantId)
            .having(Expr::expr(unpaid).gt(1))
            .order_by_asc(lease::Column::TenantId)
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(tenant_id, unpaid_leases)| InvariantBreach {
                tenant_id,
                unpaid_leases,
            })
            .collect())
    }
}

async fn admit_new(
    txn: &DatabaseTransaction,
    request: CreateLeaseRequest,
    watt: i32,
) -> LedgerResult<lease::Model> {
    let tenant = lock_tenant(txn, request.tenant_id).await?;
    if !request.is_payed {
        ensure_no_unpaid_lease(txn, &tenant, None).await?;
    }

    lease::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.id),
        property_id: Set(request.property_id),
        lease_type_id: Set(request.lease_type_id),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        is_payed: Set(request.is_payed),
        electricity_type_id: Set(request.electricity_type_id),
        watt: Set(watt),
    }
    .insert(txn)
    .await
    .map_err(|err| admission_error(err, &tenant))
}

async fn apply_update(
    txn: &DatabaseTransaction,
    id: Uuid,
    request: UpdateLeaseRequest,
) -> LedgerResult<lease::Model> {
    let existing = Lease::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::not_found("lease", id))?;

    let start_date = request.start_date.unwrap_or(existing.start_date);
    let end_date = request.end_date.unwrap_or(existing.end_date);
    validate_term(start_date, end_date)?;

    let tenant_id = request.tenant_id.unwrap_or(existing.tenant_id);
    let is_payed = request.is_payed.unwrap_or(existing.is_payed);

    let tenant = lock_tenant(txn, tenant_id).await?;
    if !is_payed {
        ensure_no_unpaid_lease(txn, &tenant, Some(id)).await?;
    }

    let mut active = existing.into_active_model();
    active.tenant_id = Set(tenant_id);
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    active.is_payed = Set(is_payed);
    if let Some(property_id) = request.property_id {
        active.property_id = Set(property_id);
    }
    if let Some(lease_type_id) = request.lease_type_id {
        active.lease_type_id = Set(lease_type_id);
    }
    if let Some(electricity_type_id) = request.electricity_type_id {
        active.electricity_type_id = Set(electricity_type_id);
    }
    if let Some(watt) = request.watt {
        active.watt = Set(watt);
    }

    active
        .update(txn)
        .await
        .map_err(|err| admission_error(err, &tenant))
}

/// Loads the tenant row, holding a row lock until the transaction ends.
async fn lock_tenant(txn: &DatabaseTransaction, tenant_id: Uuid) -> LedgerResult<tenant::Model> {
    Tenant::find_by_id(tenant_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| {
            LedgerError::ReferentialIntegrity(format!("tenant {tenant_id} does not exist"))
        })
}

async fn ensure_no_unpaid_lease(
    txn: &DatabaseTransaction,
    tenant: &tenant::Model,
    excluding: Option<Uuid>,
) -> LedgerResult<()> {
    let mut unpaid = Lease::find()
        .filter(lease::Column::TenantId.eq(tenant.id))
        .filter(lease::Column::IsPayed.eq(false));
    if let Some(lease_id) = excluding {
        unpaid = unpaid.filter(lease::Column::Id.ne(lease_id));
    }

    if unpaid.count(txn).await? > 0 {
        return Err(invariant_violation(tenant));
    }
    Ok(())
}

fn invariant_violation(tenant: &tenant::Model) -> LedgerError {
    LedgerError::InvariantViolation {
        tenant_id: tenant.id,
        tenant_name: tenant.name.clone(),
    }
}

/// A unique violation on the unpaid-lease index means a concurrent writer won.
/// SQLite does not name the constraint, so an unnamed violation counts too.
fn admission_error(err: DbErr, tenant: &tenant::Model) -> LedgerError {
    let on_guard_index = violated_constraint(&err)
        .is_none_or(|constraint| constraint == LEASE_UNPAID_GUARD_INDEX);
    if is_unique_violation(&err) && on_guard_index {
        invariant_violation(tenant)
    } else {
        err.into()
    }
}

fn validate_term(start_date: NaiveDate, end_date: NaiveDate) -> LedgerResult<()> {
    if end_date < start_date {
        return Err(LedgerError::validation(
            "end_date",
            format!("must not be before start_date ({start_date})"),
        ));
    }
    Ok(())
}

/// Commits on success; on failure rolls back and records admission rejections.
async fn finish<T>(txn: DatabaseTransaction, outcome: LedgerResult<T>) -> LedgerResult<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back lease transaction");
            }
            if let LedgerError::InvariantViolation { tenant_id, .. } = &err {
                counter!("lease_admission_rejected_total").increment(1);
                warn!(tenant_id = %tenant_id, "Lease rejected: tenant already holds an unpaid lease");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::TenantRepository;
    use crate::test_support::{TestFixture, date, setup_test_db, tenant_request};

    #[tokio::test]
    async fn test_first_lease_is_admitted() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        let lease = repo
            .create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();

        assert!(!lease.is_payed);
        assert_eq!(lease.end_date, date(2025, 1, 30));
        assert_eq!(repo.unpaid_for_tenant(fixture.tenant.id).await.unwrap(), Some(lease));
    }

    #[tokio::test]
    async fn test_second_unpaid_lease_is_rejected() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        repo.create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        let err = repo
            .create(fixture.lease_request(date(2025, 2, 1)))
            .await
            .unwrap_err();

        match err {
            LedgerError::InvariantViolation {
                tenant_id,
                tenant_name,
            } => {
                assert_eq!(tenant_id, fixture.tenant.id);
                assert_eq!(tenant_name, "Budi Santoso");
            }
            other => panic!("expected invariant violation, got {other:?}"),
        }
        assert_eq!(repo.count_for_tenant(fixture.tenant.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_paid_leases_do_not_block() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        let first = repo
            .create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        repo.set_paid(first.id, true).await.unwrap();

        repo.create(fixture.lease_request(date(2025, 2, 1)))
            .await
            .unwrap();
        assert_eq!(repo.count_for_tenant(fixture.tenant.id).await.unwrap(), 2);

        // A lease created already paid is always admitted
        let mut prepaid = fixture.lease_request(date(2025, 3, 1));
        prepaid.is_payed = true;
        repo.create(prepaid).await.unwrap();
        assert_eq!(repo.count_for_tenant(fixture.tenant.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_updating_an_unpaid_lease_does_not_block_itself() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        let lease = repo
            .create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        let updated = repo
            .update(
                lease.id,
                UpdateLeaseRequest {
                    watt: Some(1300),
                    electricity_type_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.watt, 1300);
        assert_eq!(updated.electricity_type_id, None);
        assert!(!updated.is_payed);
    }

    #[tokio::test]
    async fn test_marking_unpaid_again_is_guarded() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        let first = repo
            .create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        repo.set_paid(first.id, true).await.unwrap();
        let second = repo
            .create(fixture.lease_request(date(2025, 2, 1)))
            .await
            .unwrap();

        assert!(repo.set_paid(first.id, false).await.unwrap_err().is_invariant_violation());

        repo.set_paid(second.id, true).await.unwrap();
        assert!(!repo.set_paid(first.id, false).await.unwrap().is_payed);
    }

    #[tokio::test]
    async fn test_moving_unpaid_lease_to_busy_tenant_is_rejected() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let other = TenantRepository::new(db.clone())
            .create(tenant_request(fixture.property.id, "Rina", "rina@example.com"))
            .await
            .unwrap();
        let repo = LeaseRepository::new(db);

        let budi_lease = repo
            .create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        let mut rina_request = fixture.lease_request(date(2025, 1, 1));
        rina_request.tenant_id = other.id;
        repo.create(rina_request).await.unwrap();

        let err = repo
            .update(
                budi_lease.id,
                UpdateLeaseRequest {
                    tenant_id: Some(other.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InvariantViolation { tenant_id, .. } if tenant_id == other.id
        ));
        assert_eq!(repo.get(budi_lease.id).await.unwrap().tenant_id, fixture.tenant.id);
    }

    #[tokio::test]
    async fn test_lease_validation() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        let mut backwards = fixture.lease_request(date(2025, 1, 10));
        backwards.end_date = date(2025, 1, 9);
        assert!(matches!(
            repo.create(backwards).await,
            Err(LedgerError::Validation { field: "end_date", .. })
        ));

        let mut negative_watt = fixture.lease_request(date(2025, 1, 1));
        negative_watt.watt = -1;
        assert!(matches!(
            repo.create(negative_watt).await,
            Err(LedgerError::Validation { field: "watt", .. })
        ));

        let mut unknown_tenant = fixture.lease_request(date(2025, 1, 1));
        unknown_tenant.tenant_id = Uuid::new_v4();
        assert!(matches!(
            repo.create(unknown_tenant).await,
            Err(LedgerError::ReferentialIntegrity(_))
        ));

        let mut unknown_property = fixture.lease_request(date(2025, 1, 1));
        unknown_property.property_id = Uuid::new_v4();
        assert!(matches!(
            repo.create(unknown_property).await,
            Err(LedgerError::ReferentialIntegrity(_))
        ));

        // Rejected writes leave nothing behind
        assert_eq!(repo.count_for_tenant(fixture.tenant.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_breaches_after_rejections() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        repo.create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        for month in 2..=4 {
            let _ = repo.create(fixture.lease_request(date(2025, month, 1))).await;
        }

        assert!(repo.find_invariant_breaches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_violation_is_reported_as_invariant_violation() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db.clone());

        repo.create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();

        // Insert without the count check, as a writer that raced past it would.
        let request = fixture.lease_request(date(2025, 2, 1));
        let raced = lease::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(request.tenant_id),
            property_id: Set(request.property_id),
            lease_type_id: Set(request.lease_type_id),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            is_payed: Set(false),
            electricity_type_id: Set(request.electricity_type_id),
            watt: Set(request.watt),
        }
        .insert(&*db)
        .await
        .unwrap_err();
        assert!(is_unique_violation(&raced));

        match admission_error(raced, &fixture.tenant) {
            LedgerError::InvariantViolation {
                tenant_id,
                tenant_name,
            } => {
                assert_eq!(tenant_id, fixture.tenant.id);
                assert_eq!(tenant_name, "Budi Santoso");
            }
            other => panic!("expected invariant violation, got {other:?}"),
        }

        let unrelated = admission_error(
            DbErr::Custom("connection reset".to_string()),
            &fixture.tenant,
        );
        assert!(matches!(unrelated, LedgerError::Database(_)));
    }

    #[tokio::test]
    async fn test_delete_lease() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = LeaseRepository::new(db);

        let lease = repo
            .create(fixture.lease_request(date(2025, 1, 1)))
            .await
            .unwrap();
        repo.delete(lease.id).await.unwrap();

        assert!(matches!(repo.get(lease.id).await, Err(LedgerError::NotFound { .. })));
        // With the unpaid lease gone the tenant can be admitted again
        repo.create(fixture.lease_request(date(2025, 2, 1)))
            .await
            .unwrap();
    }
}
