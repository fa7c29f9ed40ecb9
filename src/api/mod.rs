//! HTTP interface - axum router, handlers and error responses.

/// JSON error responses
pub mod error;
/// Request handlers
pub mod handlers;

use crate::config::AppConfig;
use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared data available to all handlers.
/// Holds the database connection and the loaded application configuration.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all queries
    pub db: DatabaseConnection,
    /// Settings loaded at startup
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}

/// Builds the service router.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/pricing/calculate", get(handlers::calculate_prices))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
