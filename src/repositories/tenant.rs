//! # Tenant Repository
//!
//! This module contains the repository implementation for Tenant entities,
//! providing CRUD operations for tenant management.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult, is_unique_violation};
use crate::models::property::Entity as Property;
use crate::models::tenant::{self, Entity as Tenant};
use crate::validation::{self, NO_KTP_MAX, PASSWORD_MAX, PHONE_MAX, TENANT_NAME_MAX};

/// Request data for creating a new tenant
#[derive(Debug, Clone)]
pub struct CreateTenantRequest {
    /// Full name of the tenant
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// Property the tenant moves into
    pub property_id: Uuid,
    /// Opaque credential issued by the authentication service
    pub password: String,
    /// National identity card number
    pub no_ktp: String,
    /// Operator registering the tenant
    pub created_by: Option<Uuid>,
    /// Defaults to active when unset
    pub is_active: Option<bool>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub property_id: Option<Uuid>,
    pub password: Option<String>,
    pub no_ktp: Option<String>,
    pub is_active: Option<bool>,
}

/// Repository for Tenant database operations
#[derive(Debug, Clone)]
pub struct TenantRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl TenantRepository {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new tenant
    pub async fn create(&self, request: CreateTenantRequest) -> LedgerResult<tenant::Model> {
        self.validate_tenant_name(&request.name)?;
        let email = validation::email("email", &request.email)?;
        let phone_number = validation::text("phone_number", &request.phone_number, PHONE_MAX)?;
        let no_ktp = validation::text("no_ktp", &request.no_ktp, NO_KTP_MAX)?;
        validate_password(&request.password)?;
        self.ensure_property(request.property_id).await?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(LedgerError::validation("email", "is already registered"));
        }

        let tenant = tenant::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            email: Set(email),
            phone_number: Set(phone_number),
            property_id: Set(request.property_id),
            password: Set(request.password),
            created_at: Set(Utc::now().into()),
            created_by: Set(request.created_by),
            is_active: Set(request.is_active.unwrap_or(true)),
            no_ktp: Set(no_ktp),
        }
        .insert(&*self.db)
        .await
        .map_err(map_email_conflict)?;

        tracing::info!(tenant_id = %tenant.id, property_id = %tenant.property_id, "Tenant created");
        Ok(tenant)
    }

    /// Get tenant by ID
    pub async fn get(&self, tenant_id: Uuid) -> LedgerResult<tenant::Model> {
        Tenant::find_by_id(tenant_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("tenant", tenant_id))
    }

    pub async fn find_by_email(&self, email: &str) -> LedgerResult<Option<tenant::Model>> {
        Ok(Tenant::find()
            .filter(tenant::Column::Email.eq(email.trim().to_ascii_lowercase()))
            .one(&*self.db)
            .await?)
    }

    /// List all tenants
    pub async fn list(&self) -> LedgerResult<Vec<tenant::Model>> {
        Ok(Tenant::find()
            .order_by_asc(tenant::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_for_property(&self, property_id: Uuid) -> LedgerResult<Vec<tenant::Model>> {
        Ok(Tenant::find()
            .filter(tenant::Column::PropertyId.eq(property_id))
            .order_by_asc(tenant::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        request: UpdateTenantRequest,
    ) -> LedgerResult<tenant::Model> {
        let mut active = self.get(tenant_id).await?.into_active_model();

        if let Some(name) = request.name {
            self.validate_tenant_name(&name)?;
            active.name = Set(name.trim().to_string());
        }
        if let Some(email) = request.email {
            let email = validation::email("email", &email)?;
            let taken = self
                .find_by_email(&email)
                .await?
                .is_some_and(|other| other.id != tenant_id);
            if taken {
                return Err(LedgerError::validation("email", "is already registered"));
            }
            active.email = Set(email);
        }
        if let Some(phone) = request.phone_number {
            active.phone_number = Set(validation::text("phone_number", &phone, PHONE_MAX)?);
        }
        if let Some(property_id) = request.property_id {
            self.ensure_property(property_id).await?;
            active.property_id = Set(property_id);
        }
        if let Some(password) = request.password {
            validate_password(&password)?;
            active.password = Set(password);
        }
        if let Some(no_ktp) = request.no_ktp {
            active.no_ktp = Set(validation::text("no_ktp", &no_ktp, NO_KTP_MAX)?);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }

        active.update(&*self.db).await.map_err(map_email_conflict)
    }

    pub async fn set_active(&self, tenant_id: Uuid, is_active: bool) -> LedgerResult<tenant::Model> {
        self.update(
            tenant_id,
            UpdateTenantRequest {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete tenant by ID, cascading to everything recorded for the tenant
    pub async fn delete(&self, tenant_id: Uuid) -> LedgerResult<()> {
        let result = Tenant::delete_by_id(tenant_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("tenant", tenant_id));
        }
        tracing::info!(tenant_id = %tenant_id, "Tenant deleted");
        Ok(())
    }

    /// Check if tenant exists
    pub async fn exists(&self, tenant_id: Uuid) -> LedgerResult<bool> {
        Ok(Tenant::find_by_id(tenant_id).one(&*self.db).await?.is_some())
    }

    /// Get tenant count
    pub async fn count(&self) -> LedgerResult<u64> {
        Ok(Tenant::find().count(&*self.db).await?)
    }

    fn validate_tenant_name(&self, name: &str) -> LedgerResult<()> {
        validation::text("name", name, TENANT_NAME_MAX)?;

        // Letters (any script), spaces and the punctuation found in personal names
        if !name
            .trim()
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '\'' | '.' | ','))
        {
            return Err(LedgerError::validation(
                "name",
                "can only contain letters, numbers, spaces, hyphens, apostrophes, periods and commas",
            ));
        }

        Ok(())
    }

    async fn ensure_property(&self, property_id: Uuid) -> LedgerResult<()> {
        if Property::find_by_id(property_id).one(&*self.db).await?.is_none() {
            return Err(LedgerError::ReferentialIntegrity(format!(
                "property {property_id} does not exist"
            )));
        }
        Ok(())
    }
}

fn validate_password(password: &str) -> LedgerResult<()> {
    if password.is_empty() {
        return Err(LedgerError::validation("password", "is required"));
    }
    validation::max_len("password", password, PASSWORD_MAX)
}

fn map_email_conflict(err: sea_orm::DbErr) -> LedgerError {
    if is_unique_violation(&err) {
        LedgerError::validation("email", "is already registered")
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestFixture, setup_test_db, tenant_request};

    #[tokio::test]
    async fn test_create_tenant_success() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TenantRepository::new(db);

        let tenant = repo
            .create(tenant_request(fixture.property.id, "Siti Rahma", "Siti@Example.com"))
            .await
            .unwrap();

        assert_eq!(tenant.name, "Siti Rahma");
        assert_eq!(tenant.email, "siti@example.com");
        assert!(tenant.is_active);
        assert!(tenant.created_at.timestamp() > 0);
        assert!(repo.exists(tenant.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_tenant_validation() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TenantRepository::new(db);

        let empty = tenant_request(fixture.property.id, "", "a@example.com");
        assert!(matches!(
            repo.create(empty).await,
            Err(LedgerError::Validation { field: "name", .. })
        ));

        let long_name = tenant_request(fixture.property.id, &"a".repeat(256), "b@example.com");
        assert!(repo.create(long_name).await.is_err());

        let invalid_chars = tenant_request(fixture.property.id, "Test@Tenant", "c@example.com");
        assert!(repo.create(invalid_chars).await.is_err());

        let bad_email = tenant_request(fixture.property.id, "Budi", "not-an-email");
        assert!(matches!(
            repo.create(bad_email).await,
            Err(LedgerError::Validation { field: "email", .. })
        ));

        let mut long_phone = tenant_request(fixture.property.id, "Budi", "d@example.com");
        long_phone.phone_number = "0".repeat(21);
        assert!(matches!(
            repo.create(long_phone).await,
            Err(LedgerError::Validation { field: "phone_number", .. })
        ));

        let mut no_password = tenant_request(fixture.property.id, "Budi", "e@example.com");
        no_password.password = String::new();
        assert!(matches!(
            repo.create(no_password).await,
            Err(LedgerError::Validation { field: "password", .. })
        ));

        let orphan = tenant_request(Uuid::new_v4(), "Budi", "f@example.com");
        assert!(matches!(
            repo.create(orphan).await,
            Err(LedgerError::ReferentialIntegrity(_))
        ));
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TenantRepository::new(db);

        let first = repo
            .create(tenant_request(fixture.property.id, "Andi", "andi@example.com"))
            .await
            .unwrap();
        let duplicate = repo
            .create(tenant_request(fixture.property.id, "Andi Two", "ANDI@example.com"))
            .await;
        assert!(matches!(
            duplicate,
            Err(LedgerError::Validation { field: "email", .. })
        ));

        let other = repo
            .create(tenant_request(fixture.property.id, "Rina", "rina@example.com"))
            .await
            .unwrap();
        let clash = repo
            .update(
                other.id,
                UpdateTenantRequest {
                    email: Some(first.email.clone()),
                    ..Default::default()
                },
            )
            .await;
        assert!(clash.is_err());

        // Re-saving a tenant's own email is not a conflict
        let same = repo
            .update(
                first.id,
                UpdateTenantRequest {
                    email: Some("andi@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn test_list_and_count_tenants() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TenantRepository::new(db);

        // The fixture already registers one tenant
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.create(tenant_request(fixture.property.id, "Beni", "beni@example.com"))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.list_for_property(fixture.property.id).await.unwrap().len(), 2);

        let deactivated = repo.set_active(fixture.tenant.id, false).await.unwrap();
        assert!(!deactivated.is_active);

        repo.delete(fixture.tenant.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(matches!(
            repo.delete(fixture.tenant.id).await,
            Err(LedgerError::NotFound { .. })
        ));
    }
}
