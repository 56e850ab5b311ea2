//! Tenant API module (platform console)

mod handler;

use axum::{Router, middleware, routing::{get, put}};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tenants", routes())
}

fn routes() -> Router<ServerState> {
    // Tenant admins may read their own record
    let self_routes = Router::new()
        .route("/me", get(handler::get_own))
        .layer(middleware::from_fn(require_permission("reports:view")));

    // Everything else is console-only
    let console_routes = Router::new()
        .route("/", get(handler::list))
        .route("/overview", get(handler::overview))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_admin));

    self_routes.merge(console_routes)
}
