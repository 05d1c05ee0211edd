//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the token endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ObtainTokenRequest {
    pub username: String,
    pub password: String,
}

/// Response from the token endpoint. The token is shown exactly once.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Identity attached to a request after token verification.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}
