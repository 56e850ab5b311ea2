//! Notification API module (per-user feed)

mod handler;

use axum::{Router, middleware, routing::{get, put}};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/read", put(handler::mark_read))
        .layer(middleware::from_fn(require_permission("notifications:read")))
}
