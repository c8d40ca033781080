//! # Property Repository
//!
//! CRUD for rentable units. Deleting a property removes its tenants and,
//! through them, their leases, troubleshoots, bills and transactions.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::property::{self, Entity as Property};
use crate::models::property_type::Entity as PropertyType;
use crate::validation::{
    self, CREATED_BY_MAX, LEDGER_MONEY, PROPERTY_NAME_MAX, PROPERTY_NUMBER_MAX,
};

/// Request data for creating a new property
#[derive(Debug, Clone)]
pub struct CreatePropertyRequest {
    pub name: String,
    pub floor: i32,
    /// Unit number within the building, e.g. "A-12"
    pub number: String,
    pub property_type_id: Uuid,
    pub price: Decimal,
    /// Free-text name of whoever registers the property
    pub created_by: String,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePropertyRequest {
    pub name: Option<String>,
    pub floor: Option<i32>,
    pub number: Option<String>,
    pub property_type_id: Option<Uuid>,
    pub price: Option<Decimal>,
}

/// Repository for Property database operations
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl PropertyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CreatePropertyRequest) -> LedgerResult<property::Model> {
        let name = validation::text("name", &request.name, PROPERTY_NAME_MAX)?;
        let number = validation::text("number", &request.number, PROPERTY_NUMBER_MAX)?;
        let price = validation::amount("price", request.price, LEDGER_MONEY)?;
        validation::max_len("created_by", &request.created_by, CREATED_BY_MAX)?;
        self.ensure_property_type(request.property_type_id).await?;

        let model = property::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            floor: Set(request.floor),
            number: Set(number),
            property_type_id: Set(request.property_type_id),
            price: Set(price),
            created_at: Set(Utc::now().into()),
            created_by: Set(request.created_by.trim().to_string()),
        }
        .insert(&*self.db)
        .await?;

        tracing::info!(property_id = %model.id, name = %model.name, "Property created");
        Ok(model)
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<property::Model> {
        Property::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("property", id))
    }

    /// Lists properties ordered by floor then unit number.
    pub async fn list(&self) -> LedgerResult<Vec<property::Model>> {
        Ok(Property::find()
            .order_by_asc(property::Column::Floor)
            .order_by_asc(property::Column::Number)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_by_type(&self, property_type_id: Uuid) -> LedgerResult<Vec<property::Model>> {
        Ok(Property::find()
            .filter(property::Column::PropertyTypeId.eq(property_type_id))
            .order_by_asc(property::Column::Name)
            .all(&*self.db)
            .await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePropertyRequest,
    ) -> LedgerResult<property::Model> {
        let mut active = self.get(id).await?.into_active_model();

        if let Some(name) = request.name {
            active.name = Set(validation::text("name", &name, PROPERTY_NAME_MAX)?);
        }
        if let Some(floor) = request.floor {
            active.floor = Set(floor);
        }
        if let Some(number) = request.number {
            active.number = Set(validation::text("number", &number, PROPERTY_NUMBER_MAX)?);
        }
        if let Some(property_type_id) = request.property_type_id {
            self.ensure_property_type(property_type_id).await?;
            active.property_type_id = Set(property_type_id);
        }
        if let Some(price) = request.price {
            active.price = Set(validation::amount("price", price, LEDGER_MONEY)?);
        }

        Ok(active.update(&*self.db).await?)
    }

    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = Property::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("property", id));
        }
        tracing::info!(property_id = %id, "Property deleted");
        Ok(())
    }

    async fn ensure_property_type(&self, id: Uuid) -> LedgerResult<()> {
        if PropertyType::find_by_id(id).one(&*self.db).await?.is_none() {
            return Err(LedgerError::ReferentialIntegrity(format!(
                "property type {id} does not exist"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::PropertyTypeRepository;
    use crate::test_support::setup_test_db;

    fn request(property_type_id: Uuid) -> CreatePropertyRequest {
        CreatePropertyRequest {
            name: "Kost Melati 3A".to_string(),
            floor: 3,
            number: "A-3".to_string(),
            property_type_id,
            price: Decimal::new(150025, 2),
            created_by: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_update_property() {
        let db = setup_test_db().await;
        let kost = PropertyTypeRepository::new(db.clone())
            .create("Kost")
            .await
            .unwrap();
        let repo = PropertyRepository::new(db);

        let property = repo.create(request(kost.id)).await.unwrap();
        assert_eq!(property.price, Decimal::new(150025, 2));
        assert_eq!(repo.list_by_type(kost.id).await.unwrap().len(), 1);

        let updated = repo
            .update(
                property.id,
                UpdatePropertyRequest {
                    price: Some(Decimal::new(2000, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Decimal::new(2000, 0));
        assert_eq!(updated.name, "Kost Melati 3A");
    }

    #[tokio::test]
    async fn test_create_property_rejects_bad_input() {
        let db = setup_test_db().await;
        let kost = PropertyTypeRepository::new(db.clone())
            .create("Kost")
            .await
            .unwrap();
        let repo = PropertyRepository::new(db);

        let mut negative = request(kost.id);
        negative.price = Decimal::new(-1, 0);
        assert!(matches!(
            repo.create(negative).await,
            Err(LedgerError::Validation { field: "price", .. })
        ));

        let mut unnumbered = request(kost.id);
        unnumbered.number = " ".to_string();
        assert!(matches!(
            repo.create(unnumbered).await,
            Err(LedgerError::Validation { field: "number", .. })
        ));

        assert!(matches!(
            repo.create(request(Uuid::new_v4())).await,
            Err(LedgerError::ReferentialIntegrity(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_property_type_cascades_to_properties() {
        let db = setup_test_db().await;
        let types = PropertyTypeRepository::new(db.clone());
        let kost = types.create("Kost").await.unwrap();
        let repo = PropertyRepository::new(db);
        let property = repo.create(request(kost.id)).await.unwrap();

        types.delete(kost.id).await.unwrap();

        assert!(matches!(
            repo.get(property.id).await,
            Err(LedgerError::NotFound { .. })
        ));
    }
}
