//! Database queries for purchase orders.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::entity::purchase_order::{self, ActiveModel, Entity as PurchaseOrder};
use crate::error::{AppError, AppResult};
use crate::models::{AcknowledgeRequest, PurchaseOrderRequest};

use super::DbPool;

impl DbPool {
    /// Insert a new purchase order.
    pub async fn insert_purchase_order(
        &self,
        req: &PurchaseOrderRequest,
    ) -> AppResult<purchase_order::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            po_number: Set(req.po_number.clone()),
            vendor_id: Set(req.vendor_id),
            order_date: Set(req.order_date),
            delivery_date: Set(req.delivery_date),
            items: Set(req.items.clone()),
            quantity: Set(req.quantity),
            status: Set(req.status.as_str().to_string()),
            quality_rating: Set(req.quality_rating),
            issue_date: Set(req.issue_date),
            acknowledgment_date: Set(req.acknowledgment_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| constraint_error(e, "Failed to insert purchase order"))?;

        Ok(result)
    }

    /// Get a purchase order by ID.
    pub async fn get_purchase_order_by_id(
        &self,
        id: i64,
    ) -> AppResult<Option<purchase_order::Model>> {
        let result = PurchaseOrder::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get purchase order: {}", e)))?;

        Ok(result)
    }

    /// List all purchase orders, oldest first.
    pub async fn list_purchase_orders(&self) -> AppResult<Vec<purchase_order::Model>> {
        let result = PurchaseOrder::find()
            .order_by_asc(purchase_order::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list purchase orders: {}", e)))?;

        Ok(result)
    }

    /// Fully replace a purchase order's fields. Returns None for an unknown id.
    pub async fn update_purchase_order(
        &self,
        id: i64,
        req: &PurchaseOrderRequest,
    ) -> AppResult<Option<purchase_order::Model>> {
        let Some(existing) = self.get_purchase_order_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.po_number = Set(req.po_number.clone());
        active.vendor_id = Set(req.vendor_id);
        active.order_date = Set(req.order_date);
        active.delivery_date = Set(req.delivery_date);
        active.items = Set(req.items.clone());
        active.quantity = Set(req.quantity);
        active.status = Set(req.status.as_str().to_string());
        active.quality_rating = Set(req.quality_rating);
        active.issue_date = Set(req.issue_date);
        active.acknowledgment_date = Set(req.acknowledgment_date);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| constraint_error(e, "Failed to update purchase order"))?;

        Ok(Some(result))
    }

    /// Merge acknowledge-action fields and stamp the acknowledgment date.
    /// Re-acknowledging overwrites any previous timestamp.
    pub async fn acknowledge_purchase_order(
        &self,
        id: i64,
        req: &AcknowledgeRequest,
        acknowledged_at: DateTime<Utc>,
    ) -> AppResult<Option<purchase_order::Model>> {
        let Some(existing) = self.get_purchase_order_by_id(id).await? else {
            return Ok(None);
        };

        let active = merge_acknowledgment(existing, req, acknowledged_at);

        let result = active.update(self.connection()).await.map_err(|e| {
            AppError::Database(format!("Failed to acknowledge purchase order: {}", e))
        })?;

        Ok(Some(result))
    }

    /// Delete a purchase order. Returns false for an unknown id.
    pub async fn delete_purchase_order(&self, id: i64) -> AppResult<bool> {
        let result = PurchaseOrder::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete purchase order: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Check whether a PO number is already in use by another order.
    pub async fn po_number_taken(&self, po_number: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let mut select = PurchaseOrder::find().filter(purchase_order::Column::PoNumber.eq(po_number));

        if let Some(id) = exclude_id {
            select = select.filter(purchase_order::Column::Id.ne(id));
        }

        let count = select
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check PO number: {}", e)))?;

        Ok(count > 0)
    }
}

/// Map constraint violations from a write to the field they guard.
///
/// The handler-level uniqueness and vendor pre-checks are check-then-act;
/// a concurrent writer can still hit the schema constraint, and that loss
/// must surface as the same 400 the pre-check would have produced.
fn constraint_error(e: sea_orm::DbErr, context: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::field("po_number", "must be unique"),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::field("vendor_id", "unknown vendor")
        }
        _ => AppError::Database(format!("{}: {}", context, e)),
    }
}

/// Build the acknowledged row: fields present in the request are merged,
/// everything else stays untouched, and the acknowledgment date is stamped
/// unconditionally (overwriting any previous one).
fn merge_acknowledgment(
    existing: purchase_order::Model,
    req: &AcknowledgeRequest,
    acknowledged_at: DateTime<Utc>,
) -> ActiveModel {
    let mut active: ActiveModel = existing.into();
    if let Some(status) = req.status {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(order_date) = req.order_date {
        active.order_date = Set(order_date);
    }
    if let Some(delivery_date) = req.delivery_date {
        active.delivery_date = Set(delivery_date);
    }
    if let Some(ref items) = req.items {
        active.items = Set(items.clone());
    }
    if let Some(quantity) = req.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(rating) = req.quality_rating {
        active.quality_rating = Set(Some(rating));
    }
    active.acknowledgment_date = Set(Some(acknowledged_at));
    active.updated_at = Set(acknowledged_at);
    active
}

/// Fetch every purchase order for a vendor.
///
/// Generic over the connection so the metric calculators can run inside
/// a transaction as well as on the pool.
pub async fn find_by_vendor_id<C: ConnectionTrait>(
    conn: &C,
    vendor_id: i64,
) -> AppResult<Vec<purchase_order::Model>> {
    let result = PurchaseOrder::find()
        .filter(purchase_order::Column::VendorId.eq(vendor_id))
        .order_by_asc(purchase_order::Column::Id)
        .all(conn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to load vendor orders: {}", e)))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::ActiveValue;
    use serde_json::json;

    use crate::models::PoStatus;

    fn existing_order(now: DateTime<Utc>) -> purchase_order::Model {
        purchase_order::Model {
            id: 1,
            po_number: "PO-1001".to_string(),
            vendor_id: 1,
            order_date: now - Duration::hours(72),
            delivery_date: now + Duration::hours(24),
            items: json!([{"sku": "bolt-m8"}]),
            quantity: 500,
            status: PoStatus::Pending.as_str().to_string(),
            quality_rating: None,
            issue_date: now - Duration::hours(48),
            acknowledgment_date: None,
            created_at: now - Duration::hours(72),
            updated_at: now - Duration::hours(72),
        }
    }

    #[test]
    fn test_merge_stamps_acknowledgment_and_leaves_other_fields_unchanged() {
        let now = Utc::now();
        let active = merge_acknowledgment(existing_order(now), &AcknowledgeRequest::default(), now);

        assert_eq!(active.acknowledgment_date, ActiveValue::Set(Some(now)));
        assert_eq!(active.updated_at, ActiveValue::Set(now));
        // Nothing else is written by an empty acknowledge
        assert!(matches!(active.status, ActiveValue::Unchanged(_)));
        assert!(matches!(active.quantity, ActiveValue::Unchanged(_)));
        assert!(matches!(active.order_date, ActiveValue::Unchanged(_)));
        assert!(matches!(active.items, ActiveValue::Unchanged(_)));
    }

    #[test]
    fn test_merge_overwrites_existing_acknowledgment_date() {
        let now = Utc::now();
        let mut order = existing_order(now);
        order.acknowledgment_date = Some(now - Duration::hours(5));

        let active = merge_acknowledgment(order, &AcknowledgeRequest::default(), now);

        assert_eq!(active.acknowledgment_date, ActiveValue::Set(Some(now)));
    }

    #[test]
    fn test_merge_applies_provided_fields() {
        let now = Utc::now();
        let req = AcknowledgeRequest {
            status: Some(PoStatus::Completed),
            quality_rating: Some(4.5),
            quantity: Some(250),
            ..Default::default()
        };

        let active = merge_acknowledgment(existing_order(now), &req, now);

        assert_eq!(
            active.status,
            ActiveValue::Set(PoStatus::Completed.as_str().to_string())
        );
        assert_eq!(active.quality_rating, ActiveValue::Set(Some(4.5)));
        assert_eq!(active.quantity, ActiveValue::Set(250));
        assert!(matches!(active.delivery_date, ActiveValue::Unchanged(_)));
    }
}
