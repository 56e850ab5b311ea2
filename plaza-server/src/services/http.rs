//! HTTP service
//!
//! Router assembly, the shared middleware stack and the serve loop.

use std::net::SocketAddr;

use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::utils::AppError;

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::auth::router())
        .merge(crate::api::health::router())
        // Platform console
        .merge(crate::api::tenants::router())
        // Marketplace APIs
        .merge(crate::api::listings::router())
        .merge(crate::api::slots::router())
        .merge(crate::api::bookings::router())
        .merge(crate::api::coupons::router())
        // Notifications
        .merge(crate::api::notifications::router())
        .merge(crate::api::templates::router())
}

/// Attach state and the middleware stack
pub fn build_router(state: ServerState) -> Router {
    build_app()
        // Auth middleware at router level; require_auth skips the
        // public routes internally
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .layer(middleware::from_fn(log_request))
}

/// Serve until the shutdown future resolves
pub async fn start_server<F>(
    state: ServerState,
    addr: SocketAddr,
    shutdown_signal: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}
