//! # Lookup Repositories
//!
//! Repositories for the small reference tables: property types, electricity
//! types, payment types, lease types and tax rates. Deleting a lookup row
//! cascades to every record that references it.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{lease_type, tax};
use crate::validation::{self, LOOKUP_NAME_MAX};

/// Generates a repository for a lookup table that only carries a name.
macro_rules! named_lookup_repository {
    ($(#[$meta:meta])* $repo:ident, $module:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $repo {
            /// Database connection pool
            pub db: Arc<DatabaseConnection>,
        }

        impl $repo {
            pub fn new(db: Arc<DatabaseConnection>) -> Self {
                Self { db }
            }

            pub async fn create(&self, name: &str) -> LedgerResult<crate::models::$module::Model> {
                let name = validation::text("name", name, LOOKUP_NAME_MAX)?;

                let model = crate::models::$module::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(name),
                }
                .insert(&*self.db)
                .await?;

                tracing::debug!(id = %model.id, name = %model.name, concat!("Created ", $entity));
                Ok(model)
            }

            pub async fn get(&self, id: Uuid) -> LedgerResult<crate::models::$module::Model> {
                crate::models::$module::Entity::find_by_id(id)
                    .one(&*self.db)
                    .await?
                    .ok_or_else(|| LedgerError::not_found($entity, id))
            }

            pub async fn find_by_name(
                &self,
                name: &str,
            ) -> LedgerResult<Option<crate::models::$module::Model>> {
                Ok(crate::models::$module::Entity::find()
                    .filter(crate::models::$module::Column::Name.eq(name.trim()))
                    .one(&*self.db)
                    .await?)
            }

            pub async fn list(&self) -> LedgerResult<Vec<crate::models::$module::Model>> {
                Ok(crate::models::$module::Entity::find()
                    .order_by_asc(crate::models::$module::Column::Name)
                    .all(&*self.db)
                    .await?)
            }

            pub async fn rename(
                &self,
                id: Uuid,
                name: &str,
            ) -> LedgerResult<crate::models::$module::Model> {
                let name = validation::text("name", name, LOOKUP_NAME_MAX)?;
                let mut active = self.get(id).await?.into_active_model();
                active.name = Set(name);
                Ok(active.update(&*self.db).await?)
            }

            /// Deletes the row and, through the database, everything referencing it.
            pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
                let result = crate::models::$module::Entity::delete_by_id(id)
                    .exec(&*self.db)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(LedgerError::not_found($entity, id));
                }
                Ok(())
            }
        }
    };
}

named_lookup_repository!(
    /// Repository for property types (kost, apartment, ...)
    PropertyTypeRepository,
    property_type,
    "property type"
);
named_lookup_repository!(
    /// Repository for electricity metering types
    ElectricityTypeRepository,
    electricity_type,
    "electricity type"
);
named_lookup_repository!(
    /// Repository for payment methods
    PayedTypeRepository,
    payed_type,
    "payment type"
);

/// Repository for lease term types
#[derive(Debug, Clone)]
pub struct LeaseTypeRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl LeaseTypeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, name: &str, number_of_days: i32) -> LedgerResult<lease_type::Model> {
        let name = validation::text("name", name, LOOKUP_NAME_MAX)?;
        let number_of_days = validation::positive("number_of_days", number_of_days)?;

        Ok(lease_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            number_of_days: Set(number_of_days),
        }
        .insert(&*self.db)
        .await?)
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<lease_type::Model> {
        lease_type::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("lease type", id))
    }

    pub async fn find_by_name(&self, name: &str) -> LedgerResult<Option<lease_type::Model>> {
        Ok(lease_type::Entity::find()
            .filter(lease_type::Column::Name.eq(name.trim()))
            .one(&*self.db)
            .await?)
    }

    /// Lists lease types from shortest to longest term.
    pub async fn list(&self) -> LedgerResult<Vec<lease_type::Model>> {
        Ok(lease_type::Entity::find()
            .order_by_asc(lease_type::Column::NumberOfDays)
            .order_by_asc(lease_type::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        number_of_days: Option<i32>,
    ) -> LedgerResult<lease_type::Model> {
        let mut active = self.get(id).await?.into_active_model();
        if let Some(name) = name {
            active.name = Set(validation::text("name", name, LOOKUP_NAME_MAX)?);
        }
        if let Some(days) = number_of_days {
            active.number_of_days = Set(validation::positive("number_of_days", days)?);
        }
        Ok(active.update(&*self.db).await?)
    }

    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = lease_type::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("lease type", id));
        }
        Ok(())
    }
}

/// Repository for tax rates
#[derive(Debug, Clone)]
pub struct TaxRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl TaxRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, percent: rust_decimal::Decimal) -> LedgerResult<tax::Model> {
        let percent = validation::percent("percent", percent)?;

        Ok(tax::ActiveModel {
            id: Set(Uuid::new_v4()),
            percent: Set(percent),
        }
        .insert(&*self.db)
        .await?)
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<tax::Model> {
        tax::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("tax", id))
    }

    pub async fn list(&self) -> LedgerResult<Vec<tax::Model>> {
        Ok(tax::Entity::find()
            .order_by_asc(tax::Column::Percent)
            .all(&*self.db)
            .await?)
    }

    pub async fn update(&self, id: Uuid, percent: rust_decimal::Decimal) -> LedgerResult<tax::Model> {
        let percent = validation::percent("percent", percent)?;
        let mut active = self.get(id).await?.into_active_model();
        active.percent = Set(percent);
        Ok(active.update(&*self.db).await?)
    }

    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = tax::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("tax", id));
        }
        Ok(())
    }
}
