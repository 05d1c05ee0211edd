//! Migration: Create vendors table and shared trigger function.
//!
//! Vendors carry four denormalized metric columns refreshed by the
//! performance endpoint and the response-time refresh command.

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
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                -- Vendors table
                CREATE TABLE vendors (
                    id BIGSERIAL PRIMARY KEY,
                    name VARCHAR(100) NOT NULL,
                    contact_details TEXT NOT NULL,
                    address TEXT NOT NULL,
                    vendor_code VARCHAR(50) NOT NULL UNIQUE,

                    -- Cached performance metrics (not sources of truth)
                    on_time_delivery_rate DOUBLE PRECISION NOT NULL DEFAULT 0
                        CHECK (on_time_delivery_rate >= 0 AND on_time_delivery_rate <= 100),
                    quality_rating_avg DOUBLE PRECISION NOT NULL DEFAULT 0
                        CHECK (quality_rating_avg >= 0 AND quality_rating_avg <= 5),
                    average_response_time DOUBLE PRECISION NOT NULL DEFAULT 0
                        CHECK (average_response_time >= 0),
                    fulfillment_rate DOUBLE PRECISION NOT NULL DEFAULT 0
                        CHECK (fulfillment_rate >= 0 AND fulfillment_rate <= 100),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for code lookups during uniqueness validation
                CREATE INDEX idx_vendors_vendor_code ON vendors(vendor_code);

                -- Trigger to update updated_at
                CREATE TRIGGER update_vendors_updated_at
                    BEFORE UPDATE ON vendors
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_vendors_updated_at ON vendors;
                DROP TABLE IF EXISTS vendors CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
