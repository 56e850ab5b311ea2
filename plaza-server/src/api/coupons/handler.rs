//! Coupon API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Coupon, CouponCreate, CouponUpdate, CouponValidateRequest, CouponValidateResponse,
};
use crate::db::repository::{CouponRepository, ListingRepository, record_id};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use shared::DiscountType;
use shared::util::now_millis;

fn check_value_range(discount_type: DiscountType, value: f64) -> Result<(), AppError> {
    if discount_type == DiscountType::Percentage && value > 100.0 {
        return Err(AppError::validation("Percentage discount cannot exceed 100"));
    }
    Ok(())
}

/// GET /api/coupons - tenant's coupons
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Coupon>>> {
    let tenant_id = current_user.require_tenant()?;
    let coupons = CouponRepository::new(state.get_db());
    Ok(Json(coupons.find_by_tenant(tenant_id).await?))
}

/// POST /api/coupons - create
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<Coupon>> {
    payload.validate()?;
    check_value_range(payload.discount_type, payload.value)?;
    if payload.valid_until <= payload.valid_from {
        return Err(AppError::validation("valid_until must be after valid_from"));
    }

    let tenant_id = current_user.require_tenant()?;
    let coupons = CouponRepository::new(state.get_db());

    let created = coupons
        .create(Coupon {
            id: None,
            tenant: record_id("tenant", tenant_id),
            code: payload.code,
            description: payload.description,
            discount_type: payload.discount_type,
            value: payload.value,
            min_order_amount: payload.min_order_amount,
            max_discount_amount: payload.max_discount_amount,
            valid_from: payload.valid_from,
            valid_until: payload.valid_until,
            usage_limit: payload.usage_limit,
            per_user_limit: payload.per_user_limit,
            used_count: 0,
            is_active: true,
            created_at: now_millis(),
        })
        .await?;

    tracing::info!(code = %created.code, tenant = %tenant_id, "Coupon created");
    Ok(Json(created))
}

/// Load a coupon and check it belongs to the caller's tenant
async fn load_owned(
    repo: &CouponRepository,
    id: &str,
    current_user: &CurrentUser,
) -> AppResult<Coupon> {
    let coupon = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Coupon {} not found", id)))?;

    if !current_user.is_admin() {
        let tenant_id = current_user.require_tenant()?;
        if coupon.tenant != record_id("tenant", tenant_id) {
            return Err(AppError::forbidden("Coupon belongs to another tenant"));
        }
    }
    Ok(coupon)
}

/// PUT /api/coupons/:id - update
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<Coupon>> {
    payload.validate()?;

    let coupons = CouponRepository::new(state.get_db());
    let existing = load_owned(&coupons, &id, &current_user).await?;

    // Validate the coupon as it will look after the merge
    let discount_type = payload.discount_type.unwrap_or(existing.discount_type);
    let value = payload.value.unwrap_or(existing.value);
    check_value_range(discount_type, value)?;
    let valid_from = payload.valid_from.unwrap_or(existing.valid_from);
    let valid_until = payload.valid_until.unwrap_or(existing.valid_until);
    if valid_until <= valid_from {
        return Err(AppError::validation("valid_until must be after valid_from"));
    }

    Ok(Json(coupons.update(&id, payload).await?))
}

/// DELETE /api/coupons/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let coupons = CouponRepository::new(state.get_db());
    load_owned(&coupons, &id, &current_user).await?;
    Ok(Json(coupons.delete(&id).await?))
}

/// POST /api/coupons/validate - public discount preview
///
/// Always responds 200 with `valid` set; rejection reasons ride along so
/// the checkout UI can show them inline. Per-user caps are enforced at
/// booking time (the preview has no authenticated usage history).
pub async fn validate(
    State(state): State<ServerState>,
    Json(req): Json<CouponValidateRequest>,
) -> AppResult<Json<CouponValidateResponse>> {
    let db = state.get_db();
    let listing = ListingRepository::new(db.clone())
        .find_by_id(&req.listing_id)
        .await?
        .filter(|l| l.is_active && l.is_approved)
        .ok_or_else(|| AppError::not_found(format!("Listing {} not found", req.listing_id)))?;

    let rejected = |reason: String| {
        Json(CouponValidateResponse {
            valid: false,
            discount_amount: 0.0,
            total_amount: req.order_amount,
            reason: Some(reason),
        })
    };

    let coupon = CouponRepository::new(db)
        .find_by_code(&listing.tenant.to_string(), &req.code)
        .await?;
    let Some(coupon) = coupon else {
        return Ok(rejected("Unknown coupon code".to_string()));
    };

    match pricing::evaluate(&coupon, req.order_amount, 0, now_millis()) {
        Ok(discount) => Ok(Json(CouponValidateResponse {
            valid: true,
            discount_amount: discount.discount_amount,
            total_amount: discount.total_amount,
            reason: None,
        })),
        Err(rejection) => Ok(rejected(rejection.message())),
    }
}
