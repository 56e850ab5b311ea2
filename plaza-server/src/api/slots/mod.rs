//! Slot API module (blocked windows)
//!
//! The listing-scoped routes (`/api/listings/{id}/slots`) are mounted by
//! the listings router so the whole prefix lives in one nest; this module
//! owns the handlers and the direct `/api/slots/{id}` route.

pub(crate) mod handler;

use axum::{Router, middleware, routing::delete};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/slots/{id}", delete(handler::unblock))
        .layer(middleware::from_fn(require_permission("slots:manage")))
}
