//! Actix-web extractor for token authentication.
//!
//! # Security
//! - Token values are wrapped in `SecretString` as soon as they leave the header
//! - Tokens are never logged or exposed in debug output
//! - Only the SHA-256 hash of the token touches the database

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};

use super::BootstrapToken;
use crate::config::AUTH_HEADER;
use crate::db::DbPool;
use crate::error::ErrorResponse;
use crate::models::AuthenticatedUser;
use crate::services::token;

/// Extract the token from the Authorization header, wrapping it in
/// SecretString. Accepts both `Token <value>` and `Bearer <value>` schemes.
fn extract_token(req: &HttpRequest) -> Option<SecretString> {
    req.headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Token ")
                .or_else(|| v.strip_prefix("Bearer "))
        })
        .map(|s| SecretString::from(s.trim().to_string()))
}

/// Authentication error for the extractor.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a valid auth token.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: TokenAuth) -> impl Responder {
///     // auth.user contains the authenticated user
/// }
/// ```
pub struct TokenAuth {
    pub user: AuthenticatedUser,
}

impl FromRequest for TokenAuth {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let bootstrap = req.app_data::<web::Data<BootstrapToken>>().cloned();

        // Token leaves the header wrapped in SecretString
        let provided = extract_token(req);

        Box::pin(async move {
            let Some(provided) = provided else {
                return Err(AuthError {
                    message: "Missing auth token. Provide an Authorization: Token header."
                        .to_string(),
                });
            };

            // Bootstrap token lets operators in before the first user exists.
            // Constant-time comparison, same as stored-token hashing below.
            if let Some(bootstrap) = bootstrap
                && bootstrap.verify(provided.expose_secret())
            {
                return Ok(TokenAuth {
                    user: AuthenticatedUser {
                        user_id: 0,
                        username: "bootstrap".to_string(),
                    },
                });
            }

            let pool = pool.ok_or_else(|| AuthError {
                message: "Internal configuration error".to_string(),
            })?;

            // Only the hash is compared against the database
            let hash = token::hash_token(provided.expose_secret());

            let token_row = pool
                .find_token_by_hash(&hash)
                .await
                .map_err(|e| AuthError {
                    message: e.to_string(),
                })?
                .ok_or_else(|| AuthError {
                    message: "Invalid auth token".to_string(),
                })?;

            let user = pool
                .find_user_by_id(token_row.user_id)
                .await
                .map_err(|e| AuthError {
                    message: e.to_string(),
                })?
                .ok_or_else(|| AuthError {
                    message: "Invalid auth token".to_string(),
                })?;

            Ok(TokenAuth {
                user: AuthenticatedUser {
                    user_id: user.id,
                    username: user.username,
                },
            })
        })
    }
}
