use crate::db::operations::DatabaseOperations;
use crate::models::{AgentDataQuery, AgentDataView, AppState, FollowUp, FollowUpRequest};
use crate::types::{AppError, AppResult};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/agent/data", get(list_agent_data))
        .route("/agent/data/{id}", get(get_agent_record))
        .route("/agent/data/{id}/followup", post(add_followup))
        .with_state(state)
}

async fn list_agent_data(
    State(state): State<AppState>,
    Query(query): Query<AgentDataQuery>,
) -> AppResult<Json<Vec<AgentDataView>>> {
    let limit = query.limit.unwrap_or(50);
    let rows = DatabaseOperations::list_agent_data(&state.pool, limit).await?;
    Ok(Json(rows))
}

async fn get_agent_record(
    State(state): State<AppState>,
    Path(response_id): Path<i64>,
) -> AppResult<Json<AgentDataView>> {
    let row = DatabaseOperations::get_agent_data(&state.pool, response_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("agent record {}", response_id)))?;

    Ok(Json(row))
}

/// Record a manual follow-up against the document behind an agent response.
/// This is the CRM/human side of follow-ups; the pipeline never calls it.
async fn add_followup(
    State(state): State<AppState>,
    Path(response_id): Path<i64>,
    Json(request): Json<FollowUpRequest>,
) -> AppResult<Json<FollowUp>> {
    let row = DatabaseOperations::get_agent_data(&state.pool, response_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("agent record {}", response_id)))?;

    info!(response_id, document_id = row.document_id, "Recording manual follow-up");

    let follow_up = DatabaseOperations::add_follow_up(
        &state.pool,
        row.document_id,
        "manual_review",
        &json!({
            "notes": request.notes,
            "source_response_id": response_id,
        }),
    )
    .await?;

    Ok(Json(follow_up))
}
