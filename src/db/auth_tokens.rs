//! Database queries for auth tokens.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

use crate::entity::auth_token::{self, ActiveModel, Entity as AuthToken};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Find a token row by its hash.
    pub async fn find_token_by_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<auth_token::Model>> {
        let result = AuthToken::find()
            .filter(auth_token::Column::TokenHash.eq(token_hash))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find token: {}", e)))?;

        Ok(result)
    }

    /// Replace a user's tokens with a single new one.
    ///
    /// Only hashes are stored, so re-issuing rotates rather than returning
    /// the previous token.
    pub async fn rotate_token(&self, user_id: i64, token_hash: &str) -> AppResult<()> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        AuthToken::delete_many()
            .filter(auth_token::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to revoke old tokens: {}", e)))?;

        let model = ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to store token: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit token rotation: {}", e)))?;

        Ok(())
    }
}
