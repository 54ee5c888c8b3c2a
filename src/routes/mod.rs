//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `POST /classify` - Upload a document and run the pipeline
//! - `/api/documents` - Paginated document listing and details
//! - `/api/stats` - Aggregate processing statistics
//! - `/agent/data` - Dashboard view over agent responses + follow-ups
//! - `/api/health` - Health checks
//! - `/` - Dashboard page (static files with embedded fallback)

pub mod agent_data;
pub mod classify;
pub mod documents;
pub mod health;
pub mod static_files;

use crate::models::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
///
/// API routes take precedence over static files; the dashboard page is
/// served from root `/`.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let api_router = Router::new()
        .merge(classify::router(state.clone()))
        .merge(documents::router(state.clone()))
        .merge(agent_data::router(state.clone()))
        .merge(health::router(state));

    Router::new()
        .merge(api_router)
        .merge(static_files::router())
        .layer(TraceLayer::new_for_http())
}
