//! Performance metric DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::performance_snapshot;

/// The four vendor metrics computed by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct VendorPerformance {
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

/// Snapshot row returned by the performance endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PerformanceSnapshotResponse {
    pub id: i64,
    pub vendor_id: i64,
    pub recorded_at: DateTime<Utc>,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl From<performance_snapshot::Model> for PerformanceSnapshotResponse {
    fn from(m: performance_snapshot::Model) -> Self {
        PerformanceSnapshotResponse {
            id: m.id,
            vendor_id: m.vendor_id,
            recorded_at: m.recorded_at,
            on_time_delivery_rate: m.on_time_delivery_rate,
            quality_rating_avg: m.quality_rating_avg,
            average_response_time: m.average_response_time,
            fulfillment_rate: m.fulfillment_rate,
        }
    }
}
