//! Booking API Handlers
//!
//! Booking creation re-checks availability under an in-process guard
//! keyed by (listing, date, start), so two simultaneous requests for the
//! same window cannot both insert.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::availability;
use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatusUpdate, Listing};
use crate::db::repository::{
    BookingRepository, CouponRepository, ListingRepository, SlotRepository, TenantRepository,
    UserRepository, record_id,
};
use crate::notify::booking_context;
use crate::pricing;
use crate::utils::time::{local_now, minutes_of_day, parse_date, parse_timezone};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::util::{now_millis, reference_code};
use shared::{BookingStatus, NotificationEvent, TenantStatus};

#[derive(Debug, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub date: Option<String>,
}

/// The priced window a booking request resolved to
struct PricedWindow {
    end: String,
    base_amount: f64,
    discount_amount: f64,
    total_amount: f64,
    coupon_id: Option<String>,
    coupon_code: Option<String>,
}

/// POST /api/bookings - create (customer)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    payload.validate()?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let date = parse_date(&payload.date)
        .ok_or_else(|| AppError::validation("date must be YYYY-MM-DD"))?;
    let start_minutes = minutes_of_day(&payload.start)
        .ok_or_else(|| AppError::validation("start must be HH:MM"))?;

    let db = state.get_db();
    let listing = ListingRepository::new(db.clone())
        .find_by_id(&payload.listing_id)
        .await?
        .filter(|l| l.is_active && l.is_approved)
        .ok_or_else(|| {
            AppError::not_found(format!("Listing {} not found", payload.listing_id))
        })?;
    let listing_id = listing
        .id
        .as_ref()
        .map(|i| i.to_string())
        .ok_or_else(|| AppError::internal("Listing has no id"))?;
    let tenant_id = listing.tenant.to_string();

    let tenant = TenantRepository::new(db.clone())
        .find_by_id(&tenant_id)
        .await?
        .ok_or_else(|| AppError::internal("Listing has no tenant record"))?;
    if tenant.status != TenantStatus::Approved {
        return Err(AppError::business_rule(
            "This business is not accepting bookings",
        ));
    }

    // Reject windows in the past, judged in the listing's timezone
    let tz = parse_timezone(&listing.timezone)
        .ok_or_else(|| AppError::internal("Listing has an invalid timezone"))?;
    let (today, now_minutes) = local_now(tz);
    if date < today || (date == today && start_minutes <= now_minutes) {
        return Err(AppError::validation("Cannot book a window in the past"));
    }

    // Serialize the check-then-insert section per window
    let guard_key = format!("{}|{}|{}", listing_id, payload.date, payload.start);
    let _lease = state.slot_guard().try_acquire(&guard_key).ok_or_else(|| {
        AppError::conflict("This window is being booked right now, try again")
    })?;

    // Re-check availability while holding the guard
    let occupying = BookingRepository::new(db.clone())
        .find_occupying(&listing_id, &payload.date)
        .await?;
    let blocked = SlotRepository::new(db.clone())
        .find_by_listing_date(&listing_id, &payload.date)
        .await?;
    let windows = availability::generate(&listing, date, &occupying, &blocked)?;
    let window = availability::find_window(&windows, &payload.start)
        .ok_or_else(|| AppError::validation("start does not match the listing's slot grid"))?;
    if !window.available {
        return Err(AppError::conflict("This window is no longer available"));
    }
    let window_end = window.end.clone();

    let priced = price_window(&state, &current_user, &listing, &tenant_id, &payload, window_end)
        .await?;

    let bookings = BookingRepository::new(db.clone());
    let booking = bookings
        .create(Booking {
            id: None,
            reference: reference_code(),
            listing: record_id("listing", &listing_id),
            tenant: record_id("tenant", &tenant_id),
            customer: record_id("user", &current_user.id),
            listing_name: listing.name.clone(),
            date: payload.date.clone(),
            start: payload.start.clone(),
            end: priced.end.clone(),
            guests: payload.guests.unwrap_or(1),
            base_amount: priced.base_amount,
            discount_amount: priced.discount_amount,
            total_amount: priced.total_amount,
            currency: listing.currency.clone(),
            coupon_code: priced.coupon_code.clone(),
            status: BookingStatus::Pending,
            note: payload.note.clone(),
            created_at: now_millis(),
            updated_at: now_millis(),
        })
        .await?;

    if let Some(coupon_id) = &priced.coupon_id {
        CouponRepository::new(db.clone())
            .increment_usage(coupon_id)
            .await?;
    }

    tracing::info!(
        reference = %booking.reference,
        listing = %listing_id,
        customer = %current_user.id,
        total = booking.total_amount,
        "Booking created"
    );

    // Fan out notifications: customer + tenant owner
    let users = UserRepository::new(db);
    let context = booking_context(&booking);
    if let Ok(Some(customer)) = users.find_by_id(&current_user.id).await {
        state
            .notifier()
            .notify(NotificationEvent::BookingCreated, &customer, Some(&tenant_id), &context)
            .await;
    }
    if let Some(owner_id) = tenant.owner.as_ref().map(|o| o.to_string())
        && let Ok(Some(owner)) = users.find_by_id(&owner_id).await
    {
        state
            .notifier()
            .notify(NotificationEvent::BookingCreated, &owner, Some(&tenant_id), &context)
            .await;
    }

    Ok(Json(booking))
}

/// Resolve the price: base amount plus an optional coupon discount
async fn price_window(
    state: &ServerState,
    current_user: &CurrentUser,
    listing: &Listing,
    tenant_id: &str,
    payload: &BookingCreate,
    end: String,
) -> AppResult<PricedWindow> {
    let base_amount = listing.price_per_slot;

    let Some(code) = payload
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    else {
        return Ok(PricedWindow {
            end,
            base_amount,
            discount_amount: 0.0,
            total_amount: base_amount,
            coupon_id: None,
            coupon_code: None,
        });
    };

    let db = state.get_db();
    let coupon = CouponRepository::new(db.clone())
        .find_by_code(tenant_id, code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Coupon '{}' not found", code)))?;

    let prior_uses = BookingRepository::new(db)
        .coupon_usage_for_customer(&current_user.id, &coupon.code)
        .await? as u32;

    let discount = pricing::evaluate(&coupon, base_amount, prior_uses, now_millis())
        .map_err(|rejection| AppError::business_rule(rejection.message()))?;

    Ok(PricedWindow {
        end,
        base_amount,
        discount_amount: discount.discount_amount,
        total_amount: discount.total_amount,
        coupon_id: coupon.id.as_ref().map(|i| i.to_string()),
        coupon_code: Some(coupon.code),
    })
}

/// GET /api/bookings - customers see their own, tenant admins their tenant's
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = BookingRepository::new(state.get_db());

    if current_user.has_permission("bookings:manage") {
        let tenant_id = current_user.require_tenant()?;
        return Ok(Json(
            bookings
                .find_by_tenant(tenant_id, filter.status, filter.date)
                .await?,
        ));
    }

    Ok(Json(bookings.find_by_customer(&current_user.id).await?))
}

/// Whether the caller may see this booking
fn can_access(booking: &Booking, current_user: &CurrentUser) -> bool {
    if current_user.is_admin() {
        return true;
    }
    if booking.customer == record_id("user", &current_user.id) {
        return true;
    }
    match current_user.tenant_id.as_deref() {
        Some(tenant_id) => {
            booking.tenant == record_id("tenant", tenant_id)
                && current_user.has_permission("bookings:manage")
        }
        None => false,
    }
}

/// GET /api/bookings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let bookings = BookingRepository::new(state.get_db());
    let booking = bookings
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", id)))?;

    if !can_access(&booking, &current_user) {
        return Err(AppError::forbidden("Not your booking"));
    }
    Ok(Json(booking))
}

/// PUT /api/bookings/:id/status
///
/// Tenant admins run the full transition matrix; customers may only
/// cancel their own pending/confirmed bookings.
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let db = state.get_db();
    let bookings = BookingRepository::new(db.clone());
    let existing = bookings
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", id)))?;

    if !can_access(&existing, &current_user) {
        return Err(AppError::forbidden("Not your booking"));
    }

    let is_owner_customer = existing.customer == record_id("user", &current_user.id);
    let is_manager = current_user.is_admin() || current_user.has_permission("bookings:manage");
    if !is_manager {
        // Customers: cancellation only
        if !(is_owner_customer && payload.status == BookingStatus::Cancelled) {
            return Err(AppError::forbidden("Customers may only cancel their bookings"));
        }
    }

    if !existing.status.can_transition_to(payload.status) {
        return Err(AppError::business_rule(format!(
            "Cannot move a {:?} booking to {:?}",
            existing.status, payload.status
        )));
    }

    let booking = bookings
        .update_status(&id, payload.status, payload.note)
        .await?;

    tracing::info!(
        booking = %id,
        from = ?existing.status,
        to = ?payload.status,
        operator = %current_user.id,
        "Booking status changed"
    );

    // Notify the customer about confirmations and cancellations
    let event = match payload.status {
        BookingStatus::Confirmed => Some(NotificationEvent::BookingConfirmed),
        BookingStatus::Cancelled => Some(NotificationEvent::BookingCancelled),
        _ => None,
    };
    if let Some(event) = event {
        let users = UserRepository::new(db);
        let customer_id = booking.customer.to_string();
        if let Ok(Some(customer)) = users.find_by_id(&customer_id).await {
            state
                .notifier()
                .notify(
                    event,
                    &customer,
                    Some(&booking.tenant.to_string()),
                    &booking_context(&booking),
                )
                .await;
        }
    }

    Ok(Json(booking))
}
