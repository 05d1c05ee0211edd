//! Migration: Create vendor_performance_snapshots table.
//!
//! Append-only metric history; every performance request inserts one row.

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
                CREATE TABLE vendor_performance_snapshots (
                    id BIGSERIAL PRIMARY KEY,
                    vendor_id BIGINT NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
                    recorded_at TIMESTAMPTZ NOT NULL,

                    on_time_delivery_rate DOUBLE PRECISION NOT NULL,
                    quality_rating_avg DOUBLE PRECISION NOT NULL,
                    average_response_time DOUBLE PRECISION NOT NULL,
                    fulfillment_rate DOUBLE PRECISION NOT NULL
                );

                -- Index for per-vendor history queries, newest first
                CREATE INDEX idx_performance_snapshots_vendor_recorded
                    ON vendor_performance_snapshots(vendor_id, recorded_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS vendor_performance_snapshots CASCADE;")
            .await?;

        Ok(())
    }
}
