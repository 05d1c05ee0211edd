//! Database queries for vendor performance snapshots.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::entity::performance_snapshot::{self, ActiveModel};
use crate::error::{AppError, AppResult};
use crate::models::VendorPerformance;

/// Append a new snapshot row for a vendor.
///
/// Generic over the connection: the performance endpoint runs this in the
/// same transaction as the cached-column refresh. Failures surface as
/// InvalidInput; the metrics themselves are pure arithmetic, so a failed
/// insert is the only way the endpoint can reject a known vendor.
pub async fn insert_snapshot<C: ConnectionTrait>(
    conn: &C,
    vendor_id: i64,
    recorded_at: DateTime<Utc>,
    performance: &VendorPerformance,
) -> AppResult<performance_snapshot::Model> {
    let model = ActiveModel {
        vendor_id: Set(vendor_id),
        recorded_at: Set(recorded_at),
        on_time_delivery_rate: Set(performance.on_time_delivery_rate),
        quality_rating_avg: Set(performance.quality_rating_avg),
        average_response_time: Set(performance.average_response_time),
        fulfillment_rate: Set(performance.fulfillment_rate),
        ..Default::default()
    };

    let result = model.insert(conn).await.map_err(|e| {
        AppError::InvalidInput(format!("Failed to record performance snapshot: {}", e))
    })?;

    Ok(result)
}
