//! Migration: Create purchase_orders table.
//!
//! Purchase orders belong to a vendor and are deleted with it.

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
                CREATE TABLE purchase_orders (
                    id BIGSERIAL PRIMARY KEY,
                    po_number VARCHAR(100) NOT NULL UNIQUE,
                    vendor_id BIGINT NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,

                    order_date TIMESTAMPTZ NOT NULL,
                    delivery_date TIMESTAMPTZ NOT NULL,

                    -- Ordered items as JSONB (no element schema enforced)
                    items JSONB NOT NULL,
                    quantity INTEGER NOT NULL
                        CHECK (quantity >= 1),

                    status VARCHAR(50) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'completed', 'canceled')),

                    -- Set only after completion
                    quality_rating DOUBLE PRECISION
                        CHECK (quality_rating IS NULL OR (quality_rating >= 0 AND quality_rating <= 5)),

                    issue_date TIMESTAMPTZ NOT NULL,
                    -- No acknowledgment_date >= issue_date constraint: the
                    -- acknowledge action stamps the current clock and the
                    -- ordering is not enforced at the schema level.
                    acknowledgment_date TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for the per-vendor scans done by the metric calculators
                CREATE INDEX idx_purchase_orders_vendor_id ON purchase_orders(vendor_id);

                -- Index for status filters (completed-order aggregates)
                CREATE INDEX idx_purchase_orders_status ON purchase_orders(vendor_id, status);

                -- Trigger to update updated_at
                CREATE TRIGGER update_purchase_orders_updated_at
                    BEFORE UPDATE ON purchase_orders
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
                DROP TRIGGER IF EXISTS update_purchase_orders_updated_at ON purchase_orders;
                DROP TABLE IF EXISTS purchase_orders CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
