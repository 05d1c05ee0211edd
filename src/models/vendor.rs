//! Vendor DTOs and validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::vendor;
use crate::error::{AppError, AppResult};

/// Request body for creating or fully replacing a vendor.
///
/// The four metric fields are optional; omitted fields default to 0.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VendorRequest {
    pub name: String,
    pub contact_details: String,
    pub address: String,
    pub vendor_code: String,
    #[serde(default)]
    pub on_time_delivery_rate: Option<f64>,
    #[serde(default)]
    pub quality_rating_avg: Option<f64>,
    #[serde(default)]
    pub average_response_time: Option<f64>,
    #[serde(default)]
    pub fulfillment_rate: Option<f64>,
}

impl VendorRequest {
    /// Validate field constraints, collecting every violation.
    pub fn validate(&self) -> AppResult<()> {
        let mut fields = BTreeMap::new();

        if self.name.trim().is_empty() {
            fields.insert("name".to_string(), "must not be empty".to_string());
        } else if self.name.len() > 100 {
            fields.insert("name".to_string(), "must be at most 100 characters".to_string());
        }

        if self.vendor_code.trim().is_empty() {
            fields.insert("vendor_code".to_string(), "must not be empty".to_string());
        } else if self.vendor_code.len() > 50 {
            fields.insert(
                "vendor_code".to_string(),
                "must be at most 50 characters".to_string(),
            );
        }

        if let Some(v) = self.on_time_delivery_rate
            && !(0.0..=100.0).contains(&v)
        {
            fields.insert(
                "on_time_delivery_rate".to_string(),
                "must be between 0 and 100".to_string(),
            );
        }

        if let Some(v) = self.quality_rating_avg
            && !(0.0..=5.0).contains(&v)
        {
            fields.insert(
                "quality_rating_avg".to_string(),
                "must be between 0 and 5".to_string(),
            );
        }

        if let Some(v) = self.average_response_time
            && v < 0.0
        {
            fields.insert(
                "average_response_time".to_string(),
                "must not be negative".to_string(),
            );
        }

        if let Some(v) = self.fulfillment_rate
            && !(0.0..=100.0).contains(&v)
        {
            fields.insert(
                "fulfillment_rate".to_string(),
                "must be between 0 and 100".to_string(),
            );
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(fields))
        }
    }
}

/// Vendor representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorResponse {
    pub id: i64,
    pub name: String,
    pub contact_details: String,
    pub address: String,
    pub vendor_code: String,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<vendor::Model> for VendorResponse {
    fn from(m: vendor::Model) -> Self {
        VendorResponse {
            id: m.id,
            name: m.name,
            contact_details: m.contact_details,
            address: m.address,
            vendor_code: m.vendor_code,
            on_time_delivery_rate: m.on_time_delivery_rate,
            quality_rating_avg: m.quality_rating_avg,
            average_response_time: m.average_response_time,
            fulfillment_rate: m.fulfillment_rate,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> VendorRequest {
        VendorRequest {
            name: "Acme Industrial".to_string(),
            contact_details: "sales@acme.example".to_string(),
            address: "1 Foundry Road".to_string(),
            vendor_code: "ACME-01".to_string(),
            on_time_delivery_rate: None,
            quality_rating_avg: None,
            average_response_time: None,
            fulfillment_rate: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut req = valid_request();
        req.name = "   ".to_string();
        match req.validate() {
            Err(AppError::Validation(fields)) => assert!(fields.contains_key("name")),
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_metric_ranges_rejected() {
        let mut req = valid_request();
        req.on_time_delivery_rate = Some(101.0);
        req.quality_rating_avg = Some(5.5);
        req.average_response_time = Some(-1.0);
        req.fulfillment_rate = Some(-0.1);
        match req.validate() {
            Err(AppError::Validation(fields)) => {
                assert_eq!(fields.len(), 4);
                assert!(fields.contains_key("on_time_delivery_rate"));
                assert!(fields.contains_key("quality_rating_avg"));
                assert!(fields.contains_key("average_response_time"));
                assert!(fields.contains_key("fulfillment_rate"));
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }
}
