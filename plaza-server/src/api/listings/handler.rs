//! Listing API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::availability::{self, SlotWindow};
use crate::core::ServerState;
use crate::db::models::{
    Listing, ListingApprovalUpdate, ListingCreate, ListingUpdate,
};
use crate::db::repository::{
    BookingRepository, ListingRepository, SlotRepository, record_id,
};
use crate::utils::time::{parse_date, parse_timezone};
use crate::utils::{AppError, AppResult};
use shared::ListingCategory;
use shared::util::now_millis;

#[derive(Debug, Deserialize)]
pub struct ListingFilter {
    pub category: Option<ListingCategory>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Calendar date `YYYY-MM-DD`
    pub date: String,
}

/// GET /api/listings - public browse with filters
pub async fn list_public(
    State(state): State<ServerState>,
    Query(filter): Query<ListingFilter>,
) -> AppResult<Json<Vec<Listing>>> {
    let listings = ListingRepository::new(state.get_db());
    let result = listings
        .find_public(filter.category, filter.city)
        .await
        .map_err(AppError::from)?;
    Ok(Json(result))
}

/// GET /api/listings/mine - tenant dashboard list
pub async fn list_own(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Listing>>> {
    let tenant_id = current_user.require_tenant()?;
    let listings = ListingRepository::new(state.get_db());
    Ok(Json(listings.find_by_tenant(tenant_id).await?))
}

/// GET /api/listings/:id - public detail
///
/// Unpublished listings are invisible here; tenants see their own
/// through `/mine`.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Listing>> {
    let listings = ListingRepository::new(state.get_db());
    let listing = listings
        .find_by_id(&id)
        .await?
        .filter(|l| l.is_active && l.is_approved)
        .ok_or_else(|| AppError::not_found(format!("Listing {} not found", id)))?;
    Ok(Json(listing))
}

/// GET /api/listings/:id/availability?date=YYYY-MM-DD - generated windows
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<SlotWindow>>> {
    let date = parse_date(&query.date)
        .ok_or_else(|| AppError::validation("date must be YYYY-MM-DD"))?;

    let db = state.get_db();
    let listing = ListingRepository::new(db.clone())
        .find_by_id(&id)
        .await?
        .filter(|l| l.is_active && l.is_approved)
        .ok_or_else(|| AppError::not_found(format!("Listing {} not found", id)))?;

    let bookings = BookingRepository::new(db.clone())
        .find_occupying(&id, &query.date)
        .await?;
    let blocked = SlotRepository::new(db)
        .find_by_listing_date(&id, &query.date)
        .await?;

    let windows = availability::generate(&listing, date, &bookings, &blocked)?;
    Ok(Json(windows))
}

/// Validate the schedule-related fields of a listing payload
fn validate_schedule(listing: &Listing) -> Result<(), AppError> {
    availability::validate_operating_hours(
        &listing.operating_hours,
        listing.slot_duration_minutes,
    )?;
    if parse_timezone(&listing.timezone).is_none() {
        return Err(AppError::validation(format!(
            "Unknown timezone '{}'",
            listing.timezone
        )));
    }
    Ok(())
}

/// POST /api/listings - create (tenant)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ListingCreate>,
) -> AppResult<Json<Listing>> {
    payload.validate()?;
    let tenant_id = current_user.require_tenant()?;

    let listing = Listing {
        id: None,
        tenant: record_id("tenant", tenant_id),
        name: payload.name,
        description: payload.description,
        category: payload.category,
        city: payload.city,
        address: payload.address,
        price_per_slot: payload.price_per_slot,
        currency: payload.currency.unwrap_or_else(|| "EUR".to_string()),
        capacity: payload.capacity.unwrap_or(1),
        slot_duration_minutes: payload.slot_duration_minutes.unwrap_or(60),
        operating_hours: payload.operating_hours,
        timezone: payload.timezone.unwrap_or_else(|| "UTC".to_string()),
        amenities: payload.amenities.unwrap_or_default(),
        photos: payload.photos.unwrap_or_default(),
        is_active: true,
        // New listings await platform moderation
        is_approved: false,
        created_at: now_millis(),
    };
    validate_schedule(&listing)?;

    let listings = ListingRepository::new(state.get_db());
    let created = listings.create(listing).await?;

    tracing::info!(
        listing = %created.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        tenant = %tenant_id,
        "Listing created (awaiting approval)"
    );
    Ok(Json(created))
}

/// Load a listing and check it belongs to the caller's tenant
async fn load_owned(
    repo: &ListingRepository,
    id: &str,
    current_user: &CurrentUser,
) -> AppResult<Listing> {
    let listing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Listing {} not found", id)))?;

    if !current_user.is_admin() {
        let tenant_id = current_user.require_tenant()?;
        if listing.tenant != record_id("tenant", tenant_id) {
            return Err(AppError::forbidden("Listing belongs to another tenant"));
        }
    }
    Ok(listing)
}

/// PUT /api/listings/:id - update (tenant)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ListingUpdate>,
) -> AppResult<Json<Listing>> {
    payload.validate()?;

    let listings = ListingRepository::new(state.get_db());
    let existing = load_owned(&listings, &id, &current_user).await?;

    // Validate the schedule as it will look after the merge
    let mut merged = existing.clone();
    if let Some(hours) = &payload.operating_hours {
        merged.operating_hours = hours.clone();
    }
    if let Some(duration) = payload.slot_duration_minutes {
        merged.slot_duration_minutes = duration;
    }
    if let Some(tz) = &payload.timezone {
        merged.timezone = tz.clone();
    }
    validate_schedule(&merged)?;

    let updated = listings.update(&id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/listings/:id - delete (tenant)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let listings = ListingRepository::new(state.get_db());
    load_owned(&listings, &id, &current_user).await?;

    let result = listings.delete(&id).await?;
    tracing::info!(listing = %id, "Listing deleted");
    Ok(Json(result))
}

/// PUT /api/listings/:id/approval - platform moderation
pub async fn set_approval(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ListingApprovalUpdate>,
) -> AppResult<Json<Listing>> {
    let listings = ListingRepository::new(state.get_db());
    let listing = listings.set_approval(&id, payload.is_approved).await?;

    tracing::info!(
        listing = %id,
        approved = payload.is_approved,
        operator = %current_user.id,
        "Listing moderation updated"
    );
    Ok(Json(listing))
}
