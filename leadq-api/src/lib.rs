//! leadq-api library - lead listing, enrichment and event ingestion
//!
//! Exposes the router and state so integration tests can drive the
//! service in-process.

pub mod api;
pub mod enrichment;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use enrichment::Enricher;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; each handler acquires and releases per query
    pub db: SqlitePool,
    /// Lead enricher (disabled when no credential is configured)
    pub enricher: Arc<dyn Enricher>,
    /// Upper bound on each enrichment call
    pub enrichment_timeout: Duration,
}

impl AppState {
    pub fn new(db: SqlitePool, enricher: Arc<dyn Enricher>, enrichment_timeout: Duration) -> Self {
        Self {
            db,
            enricher,
            enrichment_timeout,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::lead_routes())
        .merge(api::event_routes())
        .merge(api::health_routes())
        .merge(api::docs_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
