//! Notification API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Notification;
use crate::db::repository::NotificationRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/notifications - the caller's feed
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = NotificationRepository::new(state.get_db());
    Ok(Json(
        notifications.find_by_recipient(&current_user.id).await?,
    ))
}

/// PUT /api/notifications/:id/read - mark one as read
///
/// Scoped to the caller; marking someone else's notification 404s.
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let notifications = NotificationRepository::new(state.get_db());
    let updated = notifications.mark_read(&id, &current_user.id).await?;
    if !updated {
        return Err(AppError::not_found(format!("Notification {} not found", id)));
    }
    Ok(Json(true))
}
