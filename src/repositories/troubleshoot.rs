//! # Troubleshoot Repository
//!
//! Issues reported by tenants, with any number of image references. Images
//! themselves live in external storage; only their reference is stored.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::troubleshoot::{self, Entity as Troubleshoot};
use crate::models::troubleshoot_image::{self, Entity as TroubleshootImage};
use crate::validation::{self, IMAGE_REF_MAX};

/// Request data for filing a troubleshoot
#[derive(Debug, Clone)]
pub struct CreateTroubleshootRequest {
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub message: String,
    /// Storage references of attached images
    pub images: Vec<String>,
}

/// A troubleshoot together with its images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TroubleshootWithImages {
    pub troubleshoot: troubleshoot::Model,
    pub images: Vec<troubleshoot_image::Model>,
}

/// Repository for Troubleshoot database operations
#[derive(Debug, Clone)]
pub struct TroubleshootRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl TroubleshootRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Files a troubleshoot and its images in one transaction.
    pub async fn create(
        &self,
        request: CreateTroubleshootRequest,
    ) -> LedgerResult<TroubleshootWithImages> {
        let message = validate_message(&request.message)?;
        let references = request
            .images
            .iter()
            .map(|image| validation::text("image", image, IMAGE_REF_MAX))
            .collect::<LedgerResult<Vec<_>>>()?;

        let txn = self.db.begin().await?;

        let troubleshoot = troubleshoot::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(request.tenant_id),
            property_id: Set(request.property_id),
            message: Set(message),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let mut images = Vec::with_capacity(references.len());
        for image in references {
            images.push(
                troubleshoot_image::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    troubleshoot_id: Set(troubleshoot.id),
                    image: Set(image),
                }
                .insert(&txn)
                .await?,
            );
        }

        txn.commit().await?;

        tracing::info!(
            troubleshoot_id = %troubleshoot.id,
            tenant_id = %troubleshoot.tenant_id,
            images = images.len(),
            "Troubleshoot filed"
        );
        Ok(TroubleshootWithImages {
            troubleshoot,
            images,
        })
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<troubleshoot::Model> {
        Troubleshoot::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("troubleshoot", id))
    }

    pub async fn get_with_images(&self, id: Uuid) -> LedgerResult<TroubleshootWithImages> {
        let troubleshoot = self.get(id).await?;
        let images = troubleshoot
            .find_related(TroubleshootImage)
            .order_by_asc(troubleshoot_image::Column::Image)
            .all(&*self.db)
            .await?;
        Ok(TroubleshootWithImages {
            troubleshoot,
            images,
        })
    }

    /// Lists a tenant's troubleshoots, newest first.
    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> LedgerResult<Vec<troubleshoot::Model>> {
        Ok(Troubleshoot::find()
            .filter(troubleshoot::Column::TenantId.eq(tenant_id))
            .order_by_desc(troubleshoot::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_for_property(
        &self,
        property_id: Uuid,
    ) -> LedgerResult<Vec<troubleshoot::Model>> {
        Ok(Troubleshoot::find()
            .filter(troubleshoot::Column::PropertyId.eq(property_id))
            .order_by_desc(troubleshoot::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    pub async fn update_message(&self, id: Uuid, message: &str) -> LedgerResult<troubleshoot::Model> {
        let message = validate_message(message)?;
        let mut active: troubleshoot::ActiveModel = self.get(id).await?.into();
        active.message = Set(message);
        Ok(active.update(&*self.db).await?)
    }

    /// Attaches another image to an existing troubleshoot.
    pub async fn add_image(
        &self,
        troubleshoot_id: Uuid,
        image: &str,
    ) -> LedgerResult<troubleshoot_image::Model> {
        let image = validation::text("image", image, IMAGE_REF_MAX)?;
        // Surface a missing troubleshoot as NotFound rather than a foreign-key error
        self.get(troubleshoot_id).await?;

        Ok(troubleshoot_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            troubleshoot_id: Set(troubleshoot_id),
            image: Set(image),
        }
        .insert(&*self.db)
        .await?)
    }

    pub async fn list_images(
        &self,
        troubleshoot_id: Uuid,
    ) -> LedgerResult<Vec<troubleshoot_image::Model>> {
        Ok(TroubleshootImage::find()
            .filter(troubleshoot_image::Column::TroubleshootId.eq(troubleshoot_id))
            .order_by_asc(troubleshoot_image::Column::Image)
            .all(&*self.db)
            .await?)
    }

    pub async fn remove_image(&self, image_id: Uuid) -> LedgerResult<()> {
        let result = TroubleshootImage::delete_by_id(image_id)
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("troubleshoot image", image_id));
        }
        Ok(())
    }

    /// Deletes the troubleshoot and its image references.
    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = Troubleshoot::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("troubleshoot", id));
        }
        Ok(())
    }
}

fn validate_message(message: &str) -> LedgerResult<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("message", "is required"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestFixture, setup_test_db};

    fn request(fixture: &TestFixture, images: &[&str]) -> CreateTroubleshootRequest {
        CreateTroubleshootRequest {
            tenant_id: fixture.tenant.id,
            property_id: fixture.property.id,
            message: "Water heater leaks".to_string(),
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_with_images() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TroubleshootRepository::new(db);

        let filed = repo
            .create(request(&fixture, &["troubleshoot/leak-1.jpg", "troubleshoot/leak-2.jpg"]))
            .await
            .unwrap();
        assert_eq!(filed.images.len(), 2);

        repo.add_image(filed.troubleshoot.id, "troubleshoot/leak-3.jpg")
            .await
            .unwrap();
        let loaded = repo.get_with_images(filed.troubleshoot.id).await.unwrap();
        assert_eq!(loaded.images.len(), 3);
        assert_eq!(loaded.images[0].to_string(), "troubleshoot/leak-1.jpg");
    }

    #[tokio::test]
    async fn test_create_without_images_and_validation() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TroubleshootRepository::new(db);

        let filed = repo.create(request(&fixture, &[])).await.unwrap();
        assert!(filed.images.is_empty());

        let mut blank = request(&fixture, &[]);
        blank.message = "   ".to_string();
        assert!(matches!(
            repo.create(blank).await,
            Err(LedgerError::Validation { field: "message", .. })
        ));

        let too_long = "x".repeat(256);
        assert!(matches!(
            repo.create(request(&fixture, &[too_long.as_str()])).await,
            Err(LedgerError::Validation { field: "image", .. })
        ));
        assert_eq!(repo.list_for_tenant(fixture.tenant.id).await.unwrap().len(), 1);

        assert!(matches!(
            repo.add_image(Uuid::new_v4(), "a.jpg").await,
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_images() {
        let db = setup_test_db().await;
        let fixture = TestFixture::build(&db).await;
        let repo = TroubleshootRepository::new(db);

        let filed = repo
            .create(request(&fixture, &["troubleshoot/leak.jpg"]))
            .await
            .unwrap();
        repo.delete(filed.troubleshoot.id).await.unwrap();

        assert!(repo.list_images(filed.troubleshoot.id).await.unwrap().is_empty());
    }
}
