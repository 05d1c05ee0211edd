//! Domain error types for the vendor management server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::{HttpResponse, ResponseError};

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Field-level validation failure
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP method not supported on this resource
    #[error("{0}")]
    MethodNotAllowed(String),
}

impl AppError {
    /// Build a validation error for a single field.
    pub fn field(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.to_string());
        AppError::Validation(fields)
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "DATABASE_ERROR".to_string(),
                    message: "An internal database error occurred".to_string(),
                })
            }
            AppError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: "NOT_FOUND".to_string(),
                message: self.to_string(),
            }),
            AppError::InvalidInput(_) => HttpResponse::BadRequest().json(ErrorResponse {
                error: "INVALID_INPUT".to_string(),
                message: self.to_string(),
            }),
            AppError::Validation(fields) => {
                HttpResponse::BadRequest().json(ValidationErrorResponse {
                    error: "VALIDATION_ERROR".to_string(),
                    message: "One or more fields failed validation".to_string(),
                    fields: fields.clone(),
                })
            }
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(ErrorResponse {
                error: "UNAUTHORIZED".to_string(),
                message: self.to_string(),
            }),
            AppError::MethodNotAllowed(_) => {
                HttpResponse::MethodNotAllowed().json(ErrorResponse {
                    error: "METHOD_NOT_ALLOWED".to_string(),
                    message: self.to_string(),
                })
            }
        }
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Validation error response with field-keyed messages.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    /// Map of field name to the constraint it violated.
    pub fields: BTreeMap<String, String>,
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("Vendor 1".to_string())
                .error_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::field("name", "must not be empty")
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Invalid token".to_string())
                .error_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::MethodNotAllowed("PATCH is not allowed".to_string())
                .error_response()
                .status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_field_helper_keys_by_field() {
        let err = AppError::field("vendor_code", "must be unique");
        match err {
            AppError::Validation(fields) => {
                assert_eq!(
                    fields.get("vendor_code").map(String::as_str),
                    Some("must be unique")
                );
            }
            _ => panic!("expected Validation variant"),
        }
    }
}
