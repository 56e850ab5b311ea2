//! Coupon API module

mod handler;

use axum::{Router, middleware, routing::{delete, get, post, put}};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/coupons", routes())
}

fn routes() -> Router<ServerState> {
    // Public discount preview (checkout UI)
    let public_routes = Router::new().route("/validate", post(handler::validate));

    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("coupons:manage")));

    public_routes.merge(manage_routes)
}
