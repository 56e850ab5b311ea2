//! Authentication middleware
//!
//! Axum middleware for JWT authentication and authorization.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Whether a request may pass without a token.
///
/// Public surface:
/// - CORS preflight (`OPTIONS *`)
/// - non-`/api/` paths (health endpoints; unknown paths 404 normally)
/// - login / registration
/// - customer browse: `GET /api/listings...` (list, detail, availability)
/// - coupon preview (`POST /api/coupons/validate`)
fn is_public(req: &Request) -> bool {
    if req.method() == http::Method::OPTIONS {
        return true;
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") {
        return true;
    }

    if matches!(
        path,
        "/api/auth/login" | "/api/auth/register" | "/api/auth/register-tenant"
            | "/api/coupons/validate"
    ) {
        return true;
    }

    // Public browse: list, detail and availability - NOT the tenant
    // sub-routes (/mine, /{id}/slots)
    if req.method() == http::Method::GET
        && let Some(rest) = path.strip_prefix("/api/listings")
    {
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        return match segments.as_slice() {
            [] => true,
            [id] => *id != "mine",
            [_, "availability"] => true,
            _ => false,
        };
    }

    false
}

/// Authentication middleware - requires a logged-in user
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`.
/// On success a [`CurrentUser`] is injected into the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(&req) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Permission middleware - requires a specific permission
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/coupons", get(handler::list))
///     .layer(middleware::from_fn(require_permission("coupons:manage")));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id.clone(),
                    email = user.email.clone(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Admin middleware - requires the platform operator role
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            role = user.role.clone()
        );
        return Err(AppError::forbidden("Administrator role required".to_string()));
    }

    Ok(next.run(req).await)
}
