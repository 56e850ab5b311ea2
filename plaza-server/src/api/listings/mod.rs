//! Listing API module

mod handler;

use axum::{Router, middleware, routing::{delete, get, post, put}};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/listings", routes())
}

fn routes() -> Router<ServerState> {
    // Customer-facing browse (public, no auth)
    let public_routes = Router::new()
        .route("/", get(handler::list_public))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/availability", get(handler::availability));

    // Tenant dashboard
    let tenant_routes = Router::new()
        .route("/mine", get(handler::list_own))
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("listings:manage")));

    // Blocked-window management (handlers live in api::slots)
    let slot_routes = Router::new()
        .route("/{id}/slots", get(crate::api::slots::handler::list_for_listing))
        .route("/{id}/slots", post(crate::api::slots::handler::block))
        .layer(middleware::from_fn(require_permission("slots:manage")));

    // Platform moderation
    let admin_routes = Router::new()
        .route("/{id}/approval", put(handler::set_approval))
        .layer(middleware::from_fn(require_admin));

    public_routes
        .merge(tenant_routes)
        .merge(slot_routes)
        .merge(admin_routes)
}
