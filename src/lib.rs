// Docflow - document intent classification and field-extraction pipeline

pub mod agents;
pub mod config;
pub mod db;
pub mod extract;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
