//! Booking API module

mod handler;

use axum::{Router, middleware, routing::{get, post, put}};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission("bookings:create")));

    // list/get/status check ownership per-record in the handler: the same
    // routes serve customers (own bookings) and tenant admins (their
    // tenant's bookings)
    let shared_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status));

    create_routes.merge(shared_routes)
}
