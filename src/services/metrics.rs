//! Vendor performance metric calculators and the response-time refresh command.
//!
//! The four calculators are pure functions over a vendor's purchase orders,
//! re-scanning the full set on every call. The refresh command is the explicit
//! replacement for an implicit save hook: handlers invoke it after persisting
//! a completed+acknowledged order, and decide at the request boundary whether
//! its failure may be swallowed.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use tracing::debug;

use crate::db::{self, DbPool};
use crate::entity::{purchase_order, vendor};
use crate::error::{AppError, AppResult};
use crate::models::{PoStatus, VendorPerformance};

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_completed(order: &purchase_order::Model) -> bool {
    order.status == PoStatus::Completed.as_str()
}

/// Percentage of completed orders whose delivery date is not after `now`.
///
/// Compares the scheduled delivery date against the clock rather than an
/// actual delivery event. Returns 0 when no orders are completed.
pub fn on_time_delivery_rate(orders: &[purchase_order::Model], now: DateTime<Utc>) -> f64 {
    let completed: Vec<_> = orders.iter().filter(|o| is_completed(o)).collect();
    if completed.is_empty() {
        return 0.0;
    }

    let on_time = completed
        .iter()
        .filter(|o| o.delivery_date <= now)
        .count();

    round2(on_time as f64 / completed.len() as f64 * 100.0)
}

/// Mean quality rating over completed orders that carry one. 0 when none do.
pub fn quality_rating_avg(orders: &[purchase_order::Model]) -> f64 {
    let ratings: Vec<f64> = orders
        .iter()
        .filter(|o| is_completed(o))
        .filter_map(|o| o.quality_rating)
        .collect();

    if ratings.is_empty() {
        return 0.0;
    }

    round2(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Mean hours between issue and acknowledgment over completed orders with an
/// acknowledgment date. 0 when none qualify.
pub fn average_response_time(orders: &[purchase_order::Model]) -> f64 {
    let response_hours: Vec<f64> = orders
        .iter()
        .filter(|o| is_completed(o))
        .filter_map(|o| {
            o.acknowledgment_date
                .map(|ack| (ack - o.issue_date).num_milliseconds() as f64 / 3_600_000.0)
        })
        .collect();

    if response_hours.is_empty() {
        return 0.0;
    }

    round2(response_hours.iter().sum::<f64>() / response_hours.len() as f64)
}

/// Percentage of ALL orders that are completed and unrated. 0 with no orders.
///
/// A rated completed order does not count as fulfilled here. That matches
/// the formula this system has always shipped with, defensible or not.
pub fn fulfillment_rate(orders: &[purchase_order::Model]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }

    let fulfilled = orders
        .iter()
        .filter(|o| is_completed(o) && o.quality_rating.is_none())
        .count();

    round2(fulfilled as f64 / orders.len() as f64 * 100.0)
}

/// Compute all four metrics in one pass over the order set.
pub fn compute_performance(
    orders: &[purchase_order::Model],
    now: DateTime<Utc>,
) -> VendorPerformance {
    VendorPerformance {
        on_time_delivery_rate: on_time_delivery_rate(orders, now),
        quality_rating_avg: quality_rating_avg(orders),
        average_response_time: average_response_time(orders),
        fulfillment_rate: fulfillment_rate(orders),
    }
}

/// Whether a just-persisted order should trigger a response-time refresh.
pub fn triggers_response_time_refresh(order: &purchase_order::Model) -> bool {
    is_completed(order) && order.acknowledgment_date.is_some()
}

/// Recompute and persist a vendor's average response time.
///
/// Re-scans the vendor's orders and writes the new value onto the vendor row
/// inside a transaction. Last write wins when two completions race. Callers
/// log failures and let the originating request succeed.
pub async fn refresh_average_response_time(pool: &DbPool, vendor_id: i64) -> AppResult<f64> {
    let txn = pool
        .connection()
        .begin()
        .await
        .map_err(|e| AppError::Database(format!("Failed to begin refresh transaction: {}", e)))?;

    let orders = db::purchase_orders::find_by_vendor_id(&txn, vendor_id).await?;
    let avg = average_response_time(&orders);

    let vendor_row = vendor::Entity::find_by_id(vendor_id)
        .one(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to load vendor for refresh: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Vendor {}", vendor_id)))?;

    let mut active: vendor::ActiveModel = vendor_row.into();
    active.average_response_time = Set(avg);
    active.updated_at = Set(Utc::now());
    active
        .update(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to persist response time: {}", e)))?;

    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit refresh: {}", e)))?;

    debug!(vendor_id, average_response_time = avg, "Refreshed average response time");

    Ok(avg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn order(
        id: i64,
        status: PoStatus,
        delivery_offset_hours: i64,
        quality_rating: Option<f64>,
        ack_after_hours: Option<i64>,
        now: DateTime<Utc>,
    ) -> purchase_order::Model {
        let issue_date = now - Duration::hours(48);
        purchase_order::Model {
            id,
            po_number: format!("PO-{}", id),
            vendor_id: 1,
            order_date: now - Duration::hours(72),
            delivery_date: now + Duration::hours(delivery_offset_hours),
            items: json!([]),
            quantity: 1,
            status: status.as_str().to_string(),
            quality_rating,
            issue_date,
            acknowledgment_date: ack_after_hours.map(|h| issue_date + Duration::hours(h)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_all_metrics_zero_without_orders() {
        let now = Utc::now();
        let perf = compute_performance(&[], now);
        assert_eq!(perf.on_time_delivery_rate, 0.0);
        assert_eq!(perf.quality_rating_avg, 0.0);
        assert_eq!(perf.average_response_time, 0.0);
        assert_eq!(perf.fulfillment_rate, 0.0);
    }

    #[test]
    fn test_on_time_delivery_rate_counts_passed_delivery_dates() {
        let now = Utc::now();
        // Three completed orders: two with delivery dates already passed.
        let orders = vec![
            order(1, PoStatus::Completed, -24, None, None, now),
            order(2, PoStatus::Completed, -1, None, None, now),
            order(3, PoStatus::Completed, 24, None, None, now),
            // Pending orders are ignored entirely.
            order(4, PoStatus::Pending, -24, None, None, now),
        ];

        assert_eq!(on_time_delivery_rate(&orders, now), 66.67);
    }

    #[test]
    fn test_on_time_delivery_rate_zero_without_completed_orders() {
        let now = Utc::now();
        let orders = vec![
            order(1, PoStatus::Pending, -24, None, None, now),
            order(2, PoStatus::Canceled, -24, None, None, now),
        ];

        assert_eq!(on_time_delivery_rate(&orders, now), 0.0);
    }

    #[test]
    fn test_quality_rating_avg_over_rated_completed_orders() {
        let now = Utc::now();
        let orders = vec![
            order(1, PoStatus::Completed, 0, Some(4.0), None, now),
            order(2, PoStatus::Completed, 0, Some(3.5), None, now),
            order(3, PoStatus::Completed, 0, None, None, now),
            // Rated but not completed: excluded.
            order(4, PoStatus::Pending, 0, Some(1.0), None, now),
        ];

        assert_eq!(quality_rating_avg(&orders), 3.75);
    }

    #[test]
    fn test_quality_rating_avg_zero_without_rated_orders() {
        let now = Utc::now();
        let orders = vec![order(1, PoStatus::Completed, 0, None, None, now)];
        assert_eq!(quality_rating_avg(&orders), 0.0);
    }

    #[test]
    fn test_average_response_time_in_hours() {
        let now = Utc::now();
        let orders = vec![
            order(1, PoStatus::Completed, 0, None, Some(2), now),
            order(2, PoStatus::Completed, 0, None, Some(4), now),
            // Unacknowledged and non-completed orders are excluded.
            order(3, PoStatus::Completed, 0, None, None, now),
            order(4, PoStatus::Pending, 0, None, Some(100), now),
        ];

        assert_eq!(average_response_time(&orders), 3.0);
    }

    #[test]
    fn test_average_response_time_rounds_to_two_decimals() {
        let now = Utc::now();
        let issue = now - Duration::hours(48);
        let mut o = order(1, PoStatus::Completed, 0, None, None, now);
        o.acknowledgment_date = Some(issue + Duration::minutes(100));

        // 100 minutes = 1.666... hours
        assert_eq!(average_response_time(&[o]), 1.67);
    }

    #[test]
    fn test_fulfillment_rate_counts_unrated_completed_over_all() {
        let now = Utc::now();
        let orders = vec![
            order(1, PoStatus::Completed, 0, None, None, now),
            // A rating disqualifies an order from the fulfilled count.
            order(2, PoStatus::Completed, 0, Some(5.0), None, now),
            order(3, PoStatus::Pending, 0, None, None, now),
            order(4, PoStatus::Canceled, 0, None, None, now),
        ];

        assert_eq!(fulfillment_rate(&orders), 25.0);
    }

    #[test]
    fn test_triggers_refresh_requires_completed_and_acknowledged() {
        let now = Utc::now();
        assert!(triggers_response_time_refresh(&order(
            1,
            PoStatus::Completed,
            0,
            None,
            Some(1),
            now
        )));
        assert!(!triggers_response_time_refresh(&order(
            2,
            PoStatus::Completed,
            0,
            None,
            None,
            now
        )));
        assert!(!triggers_response_time_refresh(&order(
            3,
            PoStatus::Pending,
            0,
            None,
            Some(1),
            now
        )));
    }
}
