//! Domain models and request/response DTOs.

pub mod auth;
pub mod performance;
pub mod purchase_order;
pub mod vendor;

// Re-export commonly used types
pub use auth::{AuthenticatedUser, ObtainTokenRequest, TokenResponse};
pub use performance::{PerformanceSnapshotResponse, VendorPerformance};
pub use purchase_order::{
    AcknowledgeRequest, PoStatus, PurchaseOrderRequest, PurchaseOrderResponse,
};
pub use vendor::{VendorRequest, VendorResponse};
