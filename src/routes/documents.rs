use crate::db::operations::DatabaseOperations;
use crate::models::{AppState, DocumentDetail, DocumentListItem, ListDocumentsQuery, StatsReport};
use crate::types::{AppError, AppResult};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/documents", get(list_documents))
        .route("/api/documents/{id}", get(get_document_details))
        .route("/api/stats", get(get_system_stats))
        .with_state(state)
}

/// Paginated document listing, newest first, with pagination totals in
/// response headers.
async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> AppResult<(HeaderMap, Json<Vec<DocumentListItem>>)> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    info!(
        page,
        page_size,
        status = ?query.status,
        intent = ?query.intent,
        "Fetching documents"
    );

    let (items, total) = DatabaseOperations::list_documents(
        &state.pool,
        page,
        page_size,
        query.status.as_deref(),
        query.intent.as_deref(),
    )
    .await?;

    let total_pages = (total + page_size - 1) / page_size;
    let mut headers = HeaderMap::new();
    for (name, value) in [
        ("x-total-count", total),
        ("x-page", page),
        ("x-page-size", page_size),
        ("x-total-pages", total_pages),
    ] {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(&value.to_string())
                .map_err(|e| AppError::Internal(format!("invalid pagination header: {}", e)))?,
        );
    }

    Ok((headers, Json(items)))
}

async fn get_document_details(
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
) -> AppResult<Json<DocumentDetail>> {
    let document = DatabaseOperations::get_document(&state.pool, document_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("document {}", document_id)))?;

    let intents = DatabaseOperations::get_document_intents(&state.pool, document_id).await?;
    let responses = DatabaseOperations::get_agent_responses(&state.pool, document_id).await?;
    let metadata = DatabaseOperations::get_all_document_metadata(&state.pool, document_id).await?;

    Ok(Json(DocumentDetail {
        document,
        intents,
        responses,
        metadata,
    }))
}

async fn get_system_stats(State(state): State<AppState>) -> AppResult<Json<StatsReport>> {
    let stats = DatabaseOperations::get_stats(&state.pool).await?;
    Ok(Json(stats))
}
