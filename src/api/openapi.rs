//! OpenAPI documentation configuration.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::{api, error, models, services};

/// Registers the Authorization-header token scheme.
struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Token issued by POST /api/token, sent as 'Token <value>'",
                ))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vendor Management Server",
        version = "0.1.0",
        description = "API server for vendor profiles, purchase order tracking, and vendor performance metrics"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    modifiers(&TokenSecurity),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Vendor endpoints
        api::vendors::list_vendors,
        api::vendors::create_vendor,
        api::vendors::get_vendor,
        api::vendors::update_vendor,
        api::vendors::delete_vendor,
        api::vendors::get_vendor_performance,
        // Purchase order endpoints
        api::purchase_orders::list_purchase_orders,
        api::purchase_orders::create_purchase_order,
        api::purchase_orders::get_purchase_order,
        api::purchase_orders::update_purchase_order,
        api::purchase_orders::delete_purchase_order,
        api::purchase_orders::acknowledge_purchase_order,
        // Auth endpoints
        services::auth::obtain_token,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::ValidationErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Vendors
            models::VendorRequest,
            models::VendorResponse,
            models::VendorPerformance,
            models::PerformanceSnapshotResponse,
            // Purchase orders
            models::PoStatus,
            models::PurchaseOrderRequest,
            models::PurchaseOrderResponse,
            models::AcknowledgeRequest,
            // Auth
            models::ObtainTokenRequest,
            models::TokenResponse,
        )
    ),
    tags(
        (name = "Vendors", description = "Vendor profiles and performance metrics"),
        (name = "Purchase Orders", description = "Purchase order tracking and acknowledgment"),
        (name = "Auth", description = "Token authentication"),
        (name = "Health", description = "Service health probes"),
    )
)]
pub struct ApiDoc;
