//! Repository for operator accounts referenced as record creators.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult, is_unique_violation};
use crate::models::user::{self, Entity as User};
use crate::validation::{self, USERNAME_MAX};

#[derive(Debug, Clone)]
pub struct UserRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create(&self, username: &str) -> LedgerResult<user::Model> {
        let username = validation::text("username", username, USERNAME_MAX)?;

        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            created_at: Set(Utc::now().into()),
        }
        .insert(&*self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                LedgerError::validation("username", "is already taken")
            } else {
                err.into()
            }
        })
    }

    pub async fn get(&self, id: Uuid) -> LedgerResult<user::Model> {
        User::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::not_found("user", id))
    }

    pub async fn find_by_username(&self, username: &str) -> LedgerResult<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username.trim()))
            .one(&*self.db)
            .await?)
    }

    pub async fn list(&self) -> LedgerResult<Vec<user::Model>> {
        Ok(User::find()
            .order_by_asc(user::Column::Username)
            .all(&*self.db)
            .await?)
    }

    /// Deletes the user; records it created keep existing with a cleared creator.
    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        let result = User::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::not_found("user", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_test_db;

    #[tokio::test]
    async fn test_username_is_unique() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(db);

        let admin = repo.create("admin").await.unwrap();
        assert_eq!(repo.find_by_username("admin").await.unwrap(), Some(admin));

        assert!(matches!(
            repo.create(" admin ").await,
            Err(LedgerError::Validation { field: "username", .. })
        ));
        assert!(repo.create(&"u".repeat(151)).await.is_err());
    }
}
