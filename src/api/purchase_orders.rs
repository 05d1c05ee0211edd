//! Purchase order API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::TokenAuth;
use crate::db::DbPool;
use crate::entity::purchase_order;
use crate::error::{AppError, AppResult};
use crate::models::{AcknowledgeRequest, PurchaseOrderRequest, PurchaseOrderResponse};
use crate::services::metrics;

/// Run the response-time refresh for a just-persisted order if it qualifies.
///
/// Failures are logged here, at the request boundary, and never propagate:
/// the original save has already succeeded.
async fn refresh_after_save(pool: &DbPool, order: &purchase_order::Model) {
    if !metrics::triggers_response_time_refresh(order) {
        return;
    }

    if let Err(e) = metrics::refresh_average_response_time(pool, order.vendor_id).await {
        warn!(
            po_id = order.id,
            vendor_id = order.vendor_id,
            error = %e,
            "Failed to refresh average response time"
        );
    }
}

/// List all purchase orders.
#[utoipa::path(
    get,
    path = "/api/purchase_orders",
    tag = "Purchase Orders",
    responses(
        (status = 200, description = "List of purchase orders", body = [PurchaseOrderResponse]),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn list_purchase_orders(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let orders = pool.list_purchase_orders().await?;
    let response: Vec<PurchaseOrderResponse> = orders
        .into_iter()
        .map(PurchaseOrderResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Create a new purchase order.
///
/// Creating an order that is already completed and acknowledged refreshes the
/// vendor's average response time as a side effect.
#[utoipa::path(
    post,
    path = "/api/purchase_orders",
    tag = "Purchase Orders",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = PurchaseOrderResponse),
        (status = 400, description = "Validation failed", body = crate::error::ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn create_purchase_order(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    body: web::Json<PurchaseOrderRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if pool.get_vendor_by_id(req.vendor_id).await?.is_none() {
        return Err(AppError::field("vendor_id", "unknown vendor"));
    }

    if pool.po_number_taken(&req.po_number, None).await? {
        return Err(AppError::field("po_number", "must be unique"));
    }

    let order = pool.insert_purchase_order(&req).await?;

    info!(po_id = order.id, po_number = %order.po_number, "Purchase order created");

    refresh_after_save(&pool, &order).await;

    Ok(HttpResponse::Created().json(PurchaseOrderResponse::from(order)))
}

/// Get a purchase order by ID.
#[utoipa::path(
    get,
    path = "/api/purchase_orders/{id}",
    tag = "Purchase Orders",
    params(("id" = i64, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order details", body = PurchaseOrderResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn get_purchase_order(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let order = pool
        .get_purchase_order_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Purchase order {}", id)))?;

    Ok(HttpResponse::Ok().json(PurchaseOrderResponse::from(order)))
}

/// Fully replace a purchase order.
///
/// Marking an order completed with an acknowledgment date refreshes the
/// vendor's average response time as a side effect.
#[utoipa::path(
    put,
    path = "/api/purchase_orders/{id}",
    tag = "Purchase Orders",
    params(("id" = i64, Path, description = "Purchase order ID")),
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = PurchaseOrderResponse),
        (status = 400, description = "Validation failed", body = crate::error::ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn update_purchase_order(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<PurchaseOrderRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    if pool.get_vendor_by_id(req.vendor_id).await?.is_none() {
        return Err(AppError::field("vendor_id", "unknown vendor"));
    }

    if pool.po_number_taken(&req.po_number, Some(id)).await? {
        return Err(AppError::field("po_number", "must be unique"));
    }

    let order = pool
        .update_purchase_order(id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Purchase order {}", id)))?;

    refresh_after_save(&pool, &order).await;

    Ok(HttpResponse::Ok().json(PurchaseOrderResponse::from(order)))
}

/// Delete a purchase order.
#[utoipa::path(
    delete,
    path = "/api/purchase_orders/{id}",
    tag = "Purchase Orders",
    params(("id" = i64, Path, description = "Purchase order ID")),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn delete_purchase_order(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if !pool.delete_purchase_order(id).await? {
        return Err(AppError::NotFound(format!("Purchase order {}", id)));
    }

    info!(po_id = id, "Purchase order deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Acknowledge a purchase order: stamp acknowledgment_date with the current
/// time, merging any optional fields supplied in the body.
///
/// Re-acknowledging an already-acknowledged order overwrites the timestamp.
#[utoipa::path(
    post,
    path = "/api/purchase_orders/{id}/acknowledge",
    tag = "Purchase Orders",
    params(("id" = i64, Path, description = "Purchase order ID")),
    request_body = AcknowledgeRequest,
    responses(
        (status = 200, description = "Purchase order acknowledged", body = PurchaseOrderResponse),
        (status = 400, description = "Validation failed", body = crate::error::ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn acknowledge_purchase_order(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: Option<web::Json<AcknowledgeRequest>>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.map(web::Json::into_inner).unwrap_or_default();
    req.validate()?;

    let acknowledged_at = Utc::now();
    let order = pool
        .acknowledge_purchase_order(id, &req, acknowledged_at)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Purchase order {}", id)))?;

    info!(po_id = id, "Purchase order acknowledged");

    refresh_after_save(&pool, &order).await;

    Ok(HttpResponse::Ok().json(PurchaseOrderResponse::from(order)))
}

/// Reject PATCH: purchase orders only support full replacement.
pub async fn patch_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed(
        "PATCH method is not allowed. Use PUT for full updates.".to_string(),
    ))
}

/// Configure purchase order routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/purchase_orders")
            .route(web::get().to(list_purchase_orders))
            .route(web::post().to(create_purchase_order)),
    )
    .service(
        web::resource("/purchase_orders/{id}")
            .route(web::get().to(get_purchase_order))
            .route(web::put().to(update_purchase_order))
            .route(web::delete().to(delete_purchase_order))
            .route(web::patch().to(patch_not_allowed)),
    )
    .service(
        web::resource("/purchase_orders/{id}/acknowledge")
            .route(web::post().to(acknowledge_purchase_order)),
    );
}
