//! Token issuance endpoint and user provisioning.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::db::DbPool;
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::{ObtainTokenRequest, TokenResponse};
use crate::services::token;

/// Minimum password length accepted when provisioning a user.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate credentials for user provisioning, collecting every violation.
pub fn validate_credentials(username: &str, password: &str) -> AppResult<()> {
    let mut fields = BTreeMap::new();

    if username.trim().is_empty() {
        fields.insert("username".to_string(), "must not be empty".to_string());
    } else if username.len() > 150 {
        fields.insert(
            "username".to_string(),
            "must be at most 150 characters".to_string(),
        );
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        fields.insert(
            "password".to_string(),
            "must be at least 8 characters".to_string(),
        );
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// Create a user who can obtain tokens. Used by the management CLI.
pub async fn create_user(pool: &DbPool, username: &str, password: &str) -> AppResult<user::Model> {
    validate_credentials(username, password)?;

    let hash = token::hash_password(password);
    let created = pool.insert_user(username, &hash).await?;

    info!(user_id = created.id, "User created");

    Ok(created)
}

/// Reset a user's password. Returns false for an unknown username.
pub async fn set_user_password(pool: &DbPool, username: &str, password: &str) -> AppResult<bool> {
    validate_credentials(username, password)?;

    let hash = token::hash_password(password);
    pool.update_user_password(username, &hash).await
}

/// Exchange credentials for an auth token.
///
/// Issues a fresh token and rotates out any previously issued ones: only
/// token hashes are stored, so the old plaintext cannot be returned again.
#[utoipa::path(
    post,
    path = "/api/token",
    tag = "Auth",
    request_body = ObtainTokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed credentials", body = crate::error::ValidationErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
pub async fn obtain_token(
    pool: web::Data<DbPool>,
    body: web::Json<ObtainTokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.trim().is_empty() {
        return Err(AppError::field("username", "must not be empty"));
    }
    if req.password.is_empty() {
        return Err(AppError::field("password", "must not be empty"));
    }

    let user = pool
        .find_user_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !token::verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let (plaintext, hash) = token::generate_token();
    pool.rotate_token(user.id, &hash).await?;

    info!(user_id = user.id, "Auth token issued");

    Ok(HttpResponse::Ok().json(TokenResponse { token: plaintext }))
}

/// Configure auth routes. Mounted outside the authenticated scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/token").route(web::post().to(obtain_token)));
}
