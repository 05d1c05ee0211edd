//! Vendor API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use tracing::info;

use crate::auth::TokenAuth;
use crate::db::{self, DbPool};
use crate::entity::vendor;
use crate::error::{AppError, AppResult};
use crate::models::{PerformanceSnapshotResponse, VendorRequest, VendorResponse};
use crate::services::metrics;

/// List all vendors.
#[utoipa::path(
    get,
    path = "/api/vendors",
    tag = "Vendors",
    responses(
        (status = 200, description = "List of vendors", body = [VendorResponse]),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn list_vendors(_auth: TokenAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let vendors = pool.list_vendors().await?;
    let response: Vec<VendorResponse> = vendors.into_iter().map(VendorResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Create a new vendor.
#[utoipa::path(
    post,
    path = "/api/vendors",
    tag = "Vendors",
    request_body = VendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = VendorResponse),
        (status = 400, description = "Validation failed", body = crate::error::ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn create_vendor(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    body: web::Json<VendorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if pool.vendor_code_taken(&req.vendor_code, None).await? {
        return Err(AppError::field("vendor_code", "must be unique"));
    }

    let vendor = pool.insert_vendor(&req).await?;

    info!(vendor_id = vendor.id, vendor_code = %vendor.vendor_code, "Vendor created");

    Ok(HttpResponse::Created().json(VendorResponse::from(vendor)))
}

/// Get a vendor by ID.
#[utoipa::path(
    get,
    path = "/api/vendors/{id}",
    tag = "Vendors",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor details", body = VendorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn get_vendor(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let vendor = pool
        .get_vendor_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vendor {}", id)))?;

    Ok(HttpResponse::Ok().json(VendorResponse::from(vendor)))
}

/// Fully replace a vendor.
#[utoipa::path(
    put,
    path = "/api/vendors/{id}",
    tag = "Vendors",
    params(("id" = i64, Path, description = "Vendor ID")),
    request_body = VendorRequest,
    responses(
        (status = 200, description = "Vendor updated", body = VendorResponse),
        (status = 400, description = "Validation failed", body = crate::error::ValidationErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn update_vendor(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<VendorRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    if pool.vendor_code_taken(&req.vendor_code, Some(id)).await? {
        return Err(AppError::field("vendor_code", "must be unique"));
    }

    let vendor = pool
        .update_vendor(id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vendor {}", id)))?;

    Ok(HttpResponse::Ok().json(VendorResponse::from(vendor)))
}

/// Delete a vendor and, via schema cascade, its orders and snapshots.
#[utoipa::path(
    delete,
    path = "/api/vendors/{id}",
    tag = "Vendors",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn delete_vendor(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if !pool.delete_vendor(id).await? {
        return Err(AppError::NotFound(format!("Vendor {}", id)));
    }

    info!(vendor_id = id, "Vendor deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Compute current metrics, append an immutable snapshot, and return it.
///
/// Read-semantics-named but write-behavior-implemented: every call refreshes
/// the vendor's cached metric columns and grows the snapshot history by one
/// row.
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/performance",
    tag = "Vendors",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Freshly recorded performance snapshot", body = PerformanceSnapshotResponse),
        (status = 400, description = "Snapshot could not be recorded", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::error::ErrorResponse),
    ),
    security(("auth_token" = []))
)]
pub async fn get_vendor_performance(
    _auth: TokenAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let vendor_row = pool
        .get_vendor_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vendor {}", id)))?;

    let now = Utc::now();

    // The cached-column refresh and the snapshot append commit or roll back
    // together: a failed insert must not leave the vendor row overwritten.
    let txn = pool
        .connection()
        .begin()
        .await
        .map_err(|e| AppError::Database(format!("Failed to begin snapshot transaction: {}", e)))?;

    let orders = db::purchase_orders::find_by_vendor_id(&txn, id).await?;
    let performance = metrics::compute_performance(&orders, now);

    let mut active: vendor::ActiveModel = vendor_row.into();
    active.on_time_delivery_rate = Set(performance.on_time_delivery_rate);
    active.quality_rating_avg = Set(performance.quality_rating_avg);
    active.average_response_time = Set(performance.average_response_time);
    active.fulfillment_rate = Set(performance.fulfillment_rate);
    active.updated_at = Set(now);
    active
        .update(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to refresh vendor metrics: {}", e)))?;

    let snapshot = db::performance_snapshots::insert_snapshot(&txn, id, now, &performance).await?;

    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit snapshot: {}", e)))?;

    info!(vendor_id = id, snapshot_id = snapshot.id, "Performance snapshot recorded");

    Ok(HttpResponse::Ok().json(PerformanceSnapshotResponse::from(snapshot)))
}

/// Reject PATCH: vendors only support full replacement.
pub async fn patch_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed(
        "PATCH method is not allowed. Use PUT for full updates.".to_string(),
    ))
}

/// Configure vendor routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/vendors")
            .route(web::get().to(list_vendors))
            .route(web::post().to(create_vendor)),
    )
    .service(
        web::resource("/vendors/{id}")
            .route(web::get().to(get_vendor))
            .route(web::put().to(update_vendor))
            .route(web::delete().to(delete_vendor))
            .route(web::patch().to(patch_not_allowed)),
    )
    .service(
        web::resource("/vendors/{id}/performance").route(web::get().to(get_vendor_performance)),
    );
}
