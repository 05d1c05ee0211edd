//! SeaORM entity definitions for PostgreSQL database.

pub mod auth_token;
pub mod performance_snapshot;
pub mod purchase_order;
pub mod user;
pub mod vendor;
