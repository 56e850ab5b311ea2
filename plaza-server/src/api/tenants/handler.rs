//! Tenant API Handlers (platform console)

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Tenant, TenantStatusUpdate};
use crate::db::repository::{
    BookingRepository, ListingRepository, TenantRepository, UserRepository,
};
use crate::notify::tenant_context;
use crate::utils::{AppError, AppResult};
use shared::{NotificationEvent, TenantStatus};

#[derive(Debug, Deserialize)]
pub struct TenantFilter {
    pub status: Option<TenantStatus>,
}

/// Platform counters for the console landing page
#[derive(Debug, Serialize)]
pub struct PlatformOverview {
    pub tenants: i64,
    pub users: i64,
    pub listings: i64,
    pub bookings: i64,
}

/// GET /api/tenants - list tenants, optionally by status
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<TenantFilter>,
) -> AppResult<Json<Vec<Tenant>>> {
    let tenants = TenantRepository::new(state.get_db());
    let result = match filter.status {
        Some(status) => tenants.find_by_status(status).await,
        None => tenants.find_all().await,
    };
    Ok(Json(result.map_err(AppError::from)?))
}

/// GET /api/tenants/overview - platform counters
pub async fn overview(State(state): State<ServerState>) -> AppResult<Json<PlatformOverview>> {
    let db = state.get_db();
    let tenants = TenantRepository::new(db.clone()).count().await?;
    let users = UserRepository::new(db.clone()).count().await?;
    let listings = ListingRepository::new(db.clone()).count().await?;
    let bookings = BookingRepository::new(db).count().await?;

    Ok(Json(PlatformOverview {
        tenants,
        users,
        listings,
        bookings,
    }))
}

/// GET /api/tenants/me - a tenant admin's own record
pub async fn get_own(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Tenant>> {
    let tenant_id = current_user.require_tenant()?;
    let tenants = TenantRepository::new(state.get_db());
    let tenant = tenants
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| AppError::not_found("Tenant not found"))?;
    Ok(Json(tenant))
}

/// GET /api/tenants/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Tenant>> {
    let tenants = TenantRepository::new(state.get_db());
    let tenant = tenants
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Tenant {} not found", id)))?;
    Ok(Json(tenant))
}

/// PUT /api/tenants/:id/status - approve / suspend
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<TenantStatusUpdate>,
) -> AppResult<Json<Tenant>> {
    let db = state.get_db();
    let tenants = TenantRepository::new(db.clone());

    let existing = tenants
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Tenant {} not found", id)))?;

    if !existing.status.can_transition_to(payload.status) {
        return Err(AppError::business_rule(format!(
            "Tenant is already {:?}",
            existing.status
        )));
    }

    let tenant = tenants.update_status(&id, payload.status).await?;

    tracing::info!(
        tenant = %id,
        status = ?payload.status,
        operator = %current_user.id,
        "Tenant status changed"
    );

    // Notify the owner account
    let event = match payload.status {
        TenantStatus::Approved => Some(NotificationEvent::TenantApproved),
        TenantStatus::Suspended => Some(NotificationEvent::TenantSuspended),
        TenantStatus::Pending => None,
    };
    if let Some(event) = event
        && let Some(owner_id) = tenant.owner.as_ref().map(|o| o.to_string())
    {
        let users = UserRepository::new(db);
        if let Ok(Some(owner)) = users.find_by_id(&owner_id).await {
            state
                .notifier()
                .notify(event, &owner, Some(&id), &tenant_context(&tenant))
                .await;
        }
    }

    Ok(Json(tenant))
}
