//! Notification template API module

mod handler;

use axum::{Router, middleware, routing::{delete, get, post, put}};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notification-templates", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("templates:manage")))
}
