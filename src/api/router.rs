//! Service router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Handlers pull `ServiceContext` out of `State`; the webhook route reads
//! the raw body because signature verification covers bytes.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::store::ProfileStore;
use crate::config::ServiceConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn ProfileStore>,
    pub config: Arc<ServiceConfig>,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn ProfileStore>, config: ServiceConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Build the user-lifecycle service router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn service_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/webhooks/clerk", post(endpoints::webhook::clerk))
        .route(
            "/hospitals/:id/approve",
            post(endpoints::hospitals::approve),
        )
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}
