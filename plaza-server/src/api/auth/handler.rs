//! Authentication Handlers
//!
//! Login, registration and token introspection.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::{CurrentUser, default_permissions};
use crate::core::ServerState;
use crate::db::models::{Tenant, User, UserCreate};
use crate::db::repository::{TenantRepository, UserRepository};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, RegisterTenantRequest, UserInfo};
use shared::util::now_millis;
use shared::{TenantStatus, UserRole};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn user_info(user: &User, permissions: Vec<String>) -> UserInfo {
    UserInfo {
        id: user.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        role: user.role.as_str().to_string(),
        tenant_id: user.tenant.as_ref().map(|t| t.to_string()),
        permissions,
    }
}

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT token.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let users = UserRepository::new(state.get_db());
    let user = users
        .find_by_email(&req.email)
        .await
        .map_err(AppError::from)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent account enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - account not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let permissions = default_permissions(user.role);
    let user_id = user.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    let tenant_id = user.tenant.as_ref().map(|t| t.to_string());

    let token = state
        .get_jwt_service()
        .generate_token(
            &user_id,
            &user.email,
            user.role.as_str(),
            tenant_id.as_deref(),
            &permissions,
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(user_id = %user_id, role = user.role.as_str(), "Login successful");

    Ok(Json(LoginResponse {
        token,
        user: user_info(&user, permissions),
    }))
}

/// POST /api/auth/register - customer self-registration
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.display_name, "display_name", MAX_NAME_LEN)?;
    validate_password(&req.password)?;
    if !req.email.contains('@') {
        return Err(AppError::validation("email is not valid"));
    }

    let users = UserRepository::new(state.get_db());
    let user = users
        .create(UserCreate {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role: UserRole::Customer,
            tenant: None,
        })
        .await
        .map_err(AppError::from)?;

    tracing::info!(email = %user.email, "Customer account registered");
    Ok(Json(user_info(&user, default_permissions(UserRole::Customer))))
}

/// POST /api/auth/register-tenant
///
/// Creates the tenant record (status `pending`) together with its first
/// tenant-admin account. The tenant stays unbookable until the platform
/// console approves it.
pub async fn register_tenant(
    State(state): State<ServerState>,
    Json(req): Json<RegisterTenantRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_required_text(&req.tenant_name, "tenant_name", MAX_NAME_LEN)?;
    validate_required_text(&req.contact_email, "contact_email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.display_name, "display_name", MAX_NAME_LEN)?;
    validate_password(&req.password)?;

    let db = state.get_db();
    let tenants = TenantRepository::new(db.clone());
    let users = UserRepository::new(db);

    let tenant = tenants
        .create(Tenant {
            id: None,
            name: req.tenant_name,
            contact_email: req.contact_email,
            contact_phone: req.contact_phone,
            owner: None,
            status: TenantStatus::Pending,
            created_at: now_millis(),
        })
        .await
        .map_err(AppError::from)?;

    let tenant_id = tenant
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Created tenant has no id"))?;

    let user = match users
        .create(UserCreate {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role: UserRole::TenantAdmin,
            tenant: Some(tenant_id.clone()),
        })
        .await
    {
        Ok(u) => u,
        Err(e) => {
            // Best-effort rollback of the freshly created tenant record
            let _ = state
                .get_db()
                .query("DELETE $tenant")
                .bind(("tenant", tenant_id))
                .await;
            return Err(e.into());
        }
    };

    if let Some(owner_id) = user.id.clone() {
        tenants
            .set_owner(&tenant_id.to_string(), owner_id)
            .await
            .map_err(AppError::from)?;
    }

    tracing::info!(
        tenant = %tenant_id,
        email = %user.email,
        "Tenant registered (pending approval)"
    );
    Ok(Json(user_info(&user, default_permissions(UserRole::TenantAdmin))))
}

/// GET /api/auth/me - the account behind the current token
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let users = UserRepository::new(state.get_db());
    let user = users
        .find_by_id(&current_user.id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;

    Ok(Json(user_info(&user, current_user.permissions)))
}
