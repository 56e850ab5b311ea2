//! First-boot seeding
//!
//! Creates the platform admin account when none exists, so the console
//! is reachable on a fresh database.

use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::AppError;
use shared::UserRole;

const DEFAULT_ADMIN_EMAIL: &str = "admin@plaza.local";

/// Ensure one platform admin account exists.
///
/// Email/password come from `ADMIN_EMAIL` / `ADMIN_PASSWORD`; without a
/// configured password a development-only default is used and loudly
/// logged. In production a missing `ADMIN_PASSWORD` is a startup error.
pub async fn ensure_platform_admin(state: &ServerState) -> Result<(), AppError> {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());

    let users = UserRepository::new(state.get_db());
    if users.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => {
            if state.config.is_production() {
                return Err(AppError::internal(
                    "ADMIN_PASSWORD must be set in production for first boot",
                ));
            }
            tracing::warn!(
                email = %email,
                "ADMIN_PASSWORD not set, seeding platform admin with the development default"
            );
            "plaza-admin-dev".to_string()
        }
    };

    let admin = users
        .create(crate::db::models::UserCreate {
            email: email.clone(),
            password,
            display_name: "Platform Admin".to_string(),
            role: UserRole::Admin,
            tenant: None,
        })
        .await?;

    tracing::info!(
        user = %admin.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        email = %email,
        "Platform admin account seeded"
    );
    Ok(())
}
