//! Migration: Create auth_tokens table.
//!
//! Only token hashes are stored; issuing a new token rotates old ones out.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE auth_tokens (
                    id BIGSERIAL PRIMARY KEY,
                    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    -- SHA-256 hex digest of the issued token
                    token_hash CHAR(64) NOT NULL UNIQUE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for hash lookup on every authenticated request
                CREATE INDEX idx_auth_tokens_token_hash ON auth_tokens(token_hash);

                -- Index for rotation (delete by user)
                CREATE INDEX idx_auth_tokens_user_id ON auth_tokens(user_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS auth_tokens CASCADE;")
            .await?;

        Ok(())
    }
}
