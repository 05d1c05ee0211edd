//! Database queries for users.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Find a user by username.
    pub async fn find_user_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        let result = User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find user: {}", e)))?;

        Ok(result)
    }

    /// Find a user by ID.
    pub async fn find_user_by_id(&self, id: i64) -> AppResult<Option<user::Model>> {
        let result = User::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find user: {}", e)))?;

        Ok(result)
    }

    /// List all users, oldest first.
    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        let result = User::find()
            .order_by_asc(user::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

        Ok(result)
    }

    /// Insert a new user with a pre-hashed password.
    pub async fn insert_user(&self, username: &str, password_hash: &str) -> AppResult<user::Model> {
        let model = ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = model.insert(self.connection()).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::field("username", "already exists")
                }
                _ => AppError::Database(format!("Failed to insert user: {}", e)),
            }
        })?;

        Ok(result)
    }

    /// Replace a user's password hash. Returns false for an unknown username.
    pub async fn update_user_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> AppResult<bool> {
        let Some(existing) = self.find_user_by_username(username).await? else {
            return Ok(false);
        };

        let mut active: ActiveModel = existing.into();
        active.password_hash = Set(password_hash.to_string());
        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update password: {}", e)))?;

        Ok(true)
    }
}
