//! Purchase order DTOs and validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::entity::purchase_order;
use crate::error::{AppError, AppResult};

/// Purchase order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PoStatus {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl PoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for creating or fully replacing a purchase order.
///
/// `quality_rating` and `acknowledgment_date` are optional.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PurchaseOrderRequest {
    pub po_number: String,
    pub vendor_id: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    /// Arbitrary JSON array of ordered items.
    pub items: JsonValue,
    pub quantity: i32,
    #[serde(default)]
    pub status: PoStatus,
    #[serde(default)]
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    #[serde(default)]
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

impl PurchaseOrderRequest {
    /// Validate field constraints, collecting every violation.
    pub fn validate(&self) -> AppResult<()> {
        let mut fields = BTreeMap::new();

        if self.po_number.trim().is_empty() {
            fields.insert("po_number".to_string(), "must not be empty".to_string());
        } else if self.po_number.len() > 100 {
            fields.insert(
                "po_number".to_string(),
                "must be at most 100 characters".to_string(),
            );
        }

        if !self.items.is_array() {
            fields.insert("items".to_string(), "must be a JSON array".to_string());
        }

        if self.quantity < 1 {
            fields.insert("quantity".to_string(), "must be at least 1".to_string());
        }

        if let Some(r) = self.quality_rating
            && !(0.0..=5.0).contains(&r)
        {
            fields.insert(
                "quality_rating".to_string(),
                "must be between 0 and 5".to_string(),
            );
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(fields))
        }
    }
}

/// Optional fields merged into an order by the acknowledge action.
///
/// The acknowledgment timestamp itself is always stamped server-side.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AcknowledgeRequest {
    #[serde(default)]
    pub status: Option<PoStatus>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Option<JsonValue>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub quality_rating: Option<f64>,
}

impl AcknowledgeRequest {
    /// Validate the supplied fields only.
    pub fn validate(&self) -> AppResult<()> {
        let mut fields = BTreeMap::new();

        if let Some(ref items) = self.items
            && !items.is_array()
        {
            fields.insert("items".to_string(), "must be a JSON array".to_string());
        }

        if let Some(q) = self.quantity
            && q < 1
        {
            fields.insert("quantity".to_string(), "must be at least 1".to_string());
        }

        if let Some(r) = self.quality_rating
            && !(0.0..=5.0).contains(&r)
        {
            fields.insert(
                "quality_rating".to_string(),
                "must be between 0 and 5".to_string(),
            );
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(fields))
        }
    }
}

/// Purchase order representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseOrderResponse {
    pub id: i64,
    pub po_number: String,
    pub vendor_id: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub items: JsonValue,
    pub quantity: i32,
    pub status: PoStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<purchase_order::Model> for PurchaseOrderResponse {
    fn from(m: purchase_order::Model) -> Self {
        PurchaseOrderResponse {
            id: m.id,
            po_number: m.po_number,
            vendor_id: m.vendor_id,
            order_date: m.order_date,
            delivery_date: m.delivery_date,
            items: m.items,
            quantity: m.quantity,
            status: PoStatus::parse(&m.status).unwrap_or(PoStatus::Pending),
            quality_rating: m.quality_rating,
            issue_date: m.issue_date,
            acknowledgment_date: m.acknowledgment_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> PurchaseOrderRequest {
        PurchaseOrderRequest {
            po_number: "PO-1001".to_string(),
            vendor_id: 1,
            order_date: Utc::now(),
            delivery_date: Utc::now(),
            items: json!([{"sku": "bolt-m8", "count": 500}]),
            quantity: 500,
            status: PoStatus::Pending,
            quality_rating: None,
            issue_date: Utc::now(),
            acknowledgment_date: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_status_serde_round_trip() {
        assert_eq!(PoStatus::parse("completed"), Some(PoStatus::Completed));
        assert_eq!(PoStatus::parse("bogus"), None);
        assert_eq!(
            serde_json::to_string(&PoStatus::Canceled).unwrap(),
            "\"canceled\""
        );
        let status: PoStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, PoStatus::Pending);
    }

    #[test]
    fn test_non_array_items_rejected() {
        let mut req = valid_request();
        req.items = json!({"sku": "bolt-m8"});
        match req.validate() {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("items")),
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut req = valid_request();
        req.quantity = 0;
        match req.validate() {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("quantity")),
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_out_of_range_rating_rejected() {
        let mut req = valid_request();
        req.quality_rating = Some(5.1);
        assert!(req.validate().is_err());

        let ack = AcknowledgeRequest {
            quality_rating: Some(-0.5),
            ..Default::default()
        };
        assert!(ack.validate().is_err());
    }
}
