//! HTTP intake layer with Axum webhook routes.
//!
//! This crate provides:
//! - Webhook endpoints for the custody desk and the fiat processor
//! - Payload signature verification over the raw request body
//! - Normalization of provider payloads into reconciliation events

pub mod routes;
pub mod signature;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kobo_core::reconcile::EventQueue;
use kobo_shared::config::WebhookConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Serialization lane feeding the reconcile worker.
    pub queue: EventQueue,
    /// Webhook signing secrets, one per provider.
    pub webhooks: Arc<WebhookConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
