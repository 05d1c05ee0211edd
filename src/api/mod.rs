//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod purchase_orders;
pub mod vendors;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use purchase_orders::configure_routes as configure_purchase_order_routes;
pub use vendors::configure_routes as configure_vendor_routes;
