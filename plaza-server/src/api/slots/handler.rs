//! Slot API Handlers (blocked windows)

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::availability::overlaps;
use crate::core::ServerState;
use crate::db::models::{Slot, SlotBlockCreate};
use crate::db::repository::{ListingRepository, SlotRepository, record_id};
use crate::utils::time::{minutes_of_day, parse_date};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::util::now_millis;

#[derive(Debug, Deserialize)]
pub struct SlotFilter {
    pub date: Option<String>,
}

/// Check the caller's tenant owns the listing
async fn check_listing_owner(
    state: &ServerState,
    listing_id: &str,
    current_user: &CurrentUser,
) -> AppResult<()> {
    let listing = ListingRepository::new(state.get_db())
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Listing {} not found", listing_id)))?;

    if !current_user.is_admin() {
        let tenant_id = current_user.require_tenant()?;
        if listing.tenant != record_id("tenant", tenant_id) {
            return Err(AppError::forbidden("Listing belongs to another tenant"));
        }
    }
    Ok(())
}

/// GET /api/listings/:id/slots - blocked windows, optionally by date
pub async fn list_for_listing(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(listing_id): Path<String>,
    Query(filter): Query<SlotFilter>,
) -> AppResult<Json<Vec<Slot>>> {
    check_listing_owner(&state, &listing_id, &current_user).await?;

    let slots = SlotRepository::new(state.get_db());
    let result = match filter.date {
        Some(date) => slots.find_by_listing_date(&listing_id, &date).await?,
        None => slots.find_by_listing(&listing_id).await?,
    };
    Ok(Json(result))
}

/// POST /api/listings/:id/slots - block a window
pub async fn block(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(listing_id): Path<String>,
    Json(payload): Json<SlotBlockCreate>,
) -> AppResult<Json<Slot>> {
    check_listing_owner(&state, &listing_id, &current_user).await?;
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    if parse_date(&payload.date).is_none() {
        return Err(AppError::validation("date must be YYYY-MM-DD"));
    }
    let start = minutes_of_day(&payload.start)
        .ok_or_else(|| AppError::validation("start must be HH:MM"))?;
    let end = minutes_of_day(&payload.end)
        .ok_or_else(|| AppError::validation("end must be HH:MM"))?;
    if end <= start {
        return Err(AppError::validation("end must be after start"));
    }

    let slots = SlotRepository::new(state.get_db());

    // Reject doubled-up holds on the same range
    let existing = slots.find_by_listing_date(&listing_id, &payload.date).await?;
    let collides = existing.iter().any(|s| {
        match (minutes_of_day(&s.start), minutes_of_day(&s.end)) {
            (Some(s_start), Some(s_end)) => overlaps(start, end, s_start, s_end),
            _ => false,
        }
    });
    if collides {
        return Err(AppError::conflict("An overlapping block already exists"));
    }

    let tenant_id = current_user
        .tenant_id
        .clone()
        .unwrap_or_else(|| "platform".to_string());

    let slot = slots
        .create(Slot {
            id: None,
            listing: record_id("listing", &listing_id),
            tenant: record_id("tenant", &tenant_id),
            date: payload.date,
            start: payload.start,
            end: payload.end,
            reason: payload.reason,
            created_by: Some(record_id("user", &current_user.id)),
            created_at: now_millis(),
        })
        .await?;

    tracing::info!(listing = %listing_id, slot = ?slot.id, "Window blocked");
    Ok(Json(slot))
}

/// DELETE /api/slots/:id - unblock
pub async fn unblock(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let slots = SlotRepository::new(state.get_db());
    let slot = slots
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Slot {} not found", id)))?;

    if !current_user.is_admin() {
        let tenant_id = current_user.require_tenant()?;
        if slot.tenant != record_id("tenant", tenant_id) {
            return Err(AppError::forbidden("Slot belongs to another tenant"));
        }
    }

    Ok(Json(slots.delete(&id).await?))
}
