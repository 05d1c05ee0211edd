//! Business logic services.

pub mod auth;
pub mod metrics;
pub mod token;

pub use auth::configure_routes as configure_auth_routes;
