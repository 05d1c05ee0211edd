//! Database queries for vendors.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::entity::vendor::{self, ActiveModel, Entity as Vendor};
use crate::error::{AppError, AppResult};
use crate::models::VendorRequest;

use super::DbPool;

impl DbPool {
    /// Insert a new vendor. Omitted metric fields default to 0.
    pub async fn insert_vendor(&self, req: &VendorRequest) -> AppResult<vendor::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            name: Set(req.name.clone()),
            contact_details: Set(req.contact_details.clone()),
            address: Set(req.address.clone()),
            vendor_code: Set(req.vendor_code.clone()),
            on_time_delivery_rate: Set(req.on_time_delivery_rate.unwrap_or(0.0)),
            quality_rating_avg: Set(req.quality_rating_avg.unwrap_or(0.0)),
            average_response_time: Set(req.average_response_time.unwrap_or(0.0)),
            fulfillment_rate: Set(req.fulfillment_rate.unwrap_or(0.0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| constraint_error(e, "Failed to insert vendor"))?;

        Ok(result)
    }

    /// Get a vendor by ID.
    pub async fn get_vendor_by_id(&self, id: i64) -> AppResult<Option<vendor::Model>> {
        let result = Vendor::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get vendor: {}", e)))?;

        Ok(result)
    }

    /// List all vendors, oldest first.
    pub async fn list_vendors(&self) -> AppResult<Vec<vendor::Model>> {
        let result = Vendor::find()
            .order_by_asc(vendor::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list vendors: {}", e)))?;

        Ok(result)
    }

    /// Fully replace a vendor's fields. Returns None for an unknown id.
    pub async fn update_vendor(
        &self,
        id: i64,
        req: &VendorRequest,
    ) -> AppResult<Option<vendor::Model>> {
        let Some(existing) = self.get_vendor_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.name = Set(req.name.clone());
        active.contact_details = Set(req.contact_details.clone());
        active.address = Set(req.address.clone());
        active.vendor_code = Set(req.vendor_code.clone());
        active.on_time_delivery_rate = Set(req.on_time_delivery_rate.unwrap_or(0.0));
        active.quality_rating_avg = Set(req.quality_rating_avg.unwrap_or(0.0));
        active.average_response_time = Set(req.average_response_time.unwrap_or(0.0));
        active.fulfillment_rate = Set(req.fulfillment_rate.unwrap_or(0.0));
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| constraint_error(e, "Failed to update vendor"))?;

        Ok(Some(result))
    }

    /// Delete a vendor. Purchase orders and snapshots cascade in the schema.
    /// Returns false for an unknown id.
    pub async fn delete_vendor(&self, id: i64) -> AppResult<bool> {
        let result = Vendor::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete vendor: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Check whether a vendor code is already in use by another vendor.
    ///
    /// Advisory only; the insert/update path maps the unique-constraint
    /// violation a concurrent writer can still cause to the same field error.
    pub async fn vendor_code_taken(&self, code: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let mut select = Vendor::find().filter(vendor::Column::VendorCode.eq(code));

        if let Some(id) = exclude_id {
            select = select.filter(vendor::Column::Id.ne(id));
        }

        let count = select
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check vendor code: {}", e)))?;

        Ok(count > 0)
    }
}

/// Map constraint violations from a vendor write to the guarded field.
fn constraint_error(e: sea_orm::DbErr, context: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::field("vendor_code", "must be unique")
        }
        _ => AppError::Database(format!("{}: {}", context, e)),
    }
}
