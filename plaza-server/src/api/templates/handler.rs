//! Notification Template API Handlers
//!
//! Tenant admins manage their tenant's overrides; platform admins manage
//! the platform defaults (templates with no tenant).

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    NotificationTemplate, NotificationTemplateCreate, NotificationTemplateUpdate,
};
use crate::db::repository::{NotificationTemplateRepository, record_id};
use crate::utils::{AppError, AppResult};
use shared::util::now_millis;

/// The template owner for this caller: tenant admins their tenant,
/// platform admins the platform defaults
fn owner_of(current_user: &CurrentUser) -> AppResult<Option<String>> {
    if current_user.is_admin() {
        return Ok(None);
    }
    Ok(Some(current_user.require_tenant()?.to_string()))
}

/// GET /api/notification-templates
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<NotificationTemplate>>> {
    let owner = owner_of(&current_user)?;
    let templates = NotificationTemplateRepository::new(state.get_db());
    Ok(Json(templates.find_by_owner(owner.as_deref()).await?))
}

/// POST /api/notification-templates
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<NotificationTemplateCreate>,
) -> AppResult<Json<NotificationTemplate>> {
    payload.validate()?;
    let owner = owner_of(&current_user)?;

    let templates = NotificationTemplateRepository::new(state.get_db());
    let created = templates
        .create(NotificationTemplate {
            id: None,
            tenant: owner.as_deref().map(|t| record_id("tenant", t)),
            event: payload.event,
            channel: payload.channel,
            subject: payload.subject,
            body: payload.body,
            is_active: true,
            created_at: now_millis(),
        })
        .await?;

    Ok(Json(created))
}

/// Load a template and check the caller owns it
async fn load_owned(
    repo: &NotificationTemplateRepository,
    id: &str,
    current_user: &CurrentUser,
) -> AppResult<NotificationTemplate> {
    let template = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Template {} not found", id)))?;

    if !current_user.is_admin() {
        let tenant_id = current_user.require_tenant()?;
        if template.tenant != Some(record_id("tenant", tenant_id)) {
            return Err(AppError::forbidden("Template belongs to another tenant"));
        }
    }
    Ok(template)
}

/// PUT /api/notification-templates/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<NotificationTemplateUpdate>,
) -> AppResult<Json<NotificationTemplate>> {
    payload.validate()?;

    let templates = NotificationTemplateRepository::new(state.get_db());
    load_owned(&templates, &id, &current_user).await?;
    Ok(Json(templates.update(&id, payload).await?))
}

/// DELETE /api/notification-templates/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let templates = NotificationTemplateRepository::new(state.get_db());
    load_owned(&templates, &id, &current_user).await?;
    Ok(Json(templates.delete(&id).await?))
}
