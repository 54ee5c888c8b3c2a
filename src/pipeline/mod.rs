//! Pipeline Orchestrator
//!
//! Sequences one uploaded document end to end and writes an auditable trail
//! to the store as it goes:
//!
//! ```text
//! Upload
//!   │
//!   ▼
//! Ingest ──► Extract ──► Classify ──► Route ──► Extract Fields ──► Persist
//!   │           │            │          │             │               │
//!   ▼           ▼            ▼          ▼             ▼               ▼
//! status     status       status     status        status         status
//! uploaded   error        intent_    agent_        agent_         processed
//!                         error      error         error
//! ```
//!
//! Every stage failure updates the document's status and error message
//! before the pipeline aborts, so the store always reflects the last
//! completed stage. No stage is retried; stages run strictly in sequence.

use crate::agents::{agent_for_intent, IntentClassifier};
use crate::db::operations::DatabaseOperations;
use crate::extract;
use crate::models::{AppState, EnvelopeMetadata, ProcessEnvelope};
use crate::types::{AppError, AppResult, DocumentIntent, DocumentStatus};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

/// Queue that complaint follow-ups land on.
const DEFAULT_FOLLOW_UP_QUEUE: &str = "support";

/// Run the full pipeline for one uploaded file and return the unified
/// result envelope. Failures are recorded on the document row and then
/// surfaced to the caller; nothing is raised past this boundary unconverted.
pub async fn process_document(
    state: &AppState,
    filename: &str,
    content: &[u8],
) -> AppResult<ProcessEnvelope> {
    let pool = &state.pool;
    let config = &state.config;

    info!(filename = %filename, size = content.len(), "Starting document pipeline");

    // Ingest
    let mime_type = mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string();
    let document =
        DatabaseOperations::create_document(pool, filename, content.len() as i64, &mime_type, content)
            .await?;
    let document_id = document.id;

    if content.is_empty() {
        return abort(pool, document_id, DocumentStatus::Error, AppError::EmptyInput).await;
    }

    // Extract
    let extracted = match extract::process_file(filename, content) {
        Ok(extracted) => extracted,
        Err(e) => return abort(pool, document_id, DocumentStatus::Error, e).await,
    };
    DatabaseOperations::set_processed_content(pool, document_id, &extracted.content).await?;
    DatabaseOperations::set_document_metadata(pool, document_id, "source_format", &extracted.format, "string")
        .await?;
    DatabaseOperations::set_document_metadata(
        pool,
        document_id,
        "page_count",
        &extracted.page_count.to_string(),
        "number",
    )
    .await?;
    DatabaseOperations::set_document_metadata(
        pool,
        document_id,
        "text_length",
        &extracted.content.len().to_string(),
        "number",
    )
    .await?;

    // Classify
    let classification = match IntentClassifier::classify(&extracted.content, config).await {
        Ok(classification) => classification,
        Err(e) => return abort(pool, document_id, DocumentStatus::IntentError, e).await,
    };
    let intent_record = DatabaseOperations::add_intent(
        pool,
        document_id,
        classification.intent.as_str(),
        classification.confidence,
    )
    .await?;

    if classification.intent == DocumentIntent::Unknown {
        return abort(pool, document_id, DocumentStatus::IntentError, AppError::UnknownIntent).await;
    }

    // Route
    let agent = match agent_for_intent(classification.intent) {
        Ok(agent) => agent,
        Err(e) => return abort(pool, document_id, DocumentStatus::AgentError, e).await,
    };

    // Extract fields (the agent output is normalized into JSON by the agent
    // layer; unparseable output arrives wrapped under a `result` key)
    let data = match agent.extract_fields(&extracted.content, config).await {
        Ok(data) => data,
        Err(e) => return abort(pool, document_id, DocumentStatus::AgentError, e).await,
    };

    // Persist & branch
    let response_metadata = json!({
        "provider": config.llm.default_provider,
        "model": config.llm.default_model,
        "source_format": extracted.format,
    });
    DatabaseOperations::add_agent_response(
        pool,
        document_id,
        intent_record.id,
        agent.agent_type(),
        &data,
        &response_metadata,
    )
    .await?;

    if classification.intent == DocumentIntent::Complaint {
        let priority = complaint_priority(&data);
        DatabaseOperations::add_follow_up(
            pool,
            document_id,
            "complaint_review",
            &json!({
                "priority": priority,
                "assigned_to": DEFAULT_FOLLOW_UP_QUEUE,
                "source_agent": agent.agent_type(),
            }),
        )
        .await?;
        info!(document_id, priority, "Complaint follow-up queued");
    }

    DatabaseOperations::update_document_status(pool, document_id, DocumentStatus::Processed, None)
        .await?;

    info!(document_id, intent = %classification.intent, "Document pipeline complete");

    Ok(ProcessEnvelope {
        status: DocumentStatus::Processed.as_str().to_string(),
        document_id,
        intent: classification.intent.as_str().to_string(),
        confidence: classification.confidence,
        data,
        metadata: EnvelopeMetadata {
            filename: filename.to_string(),
            processed_at: Utc::now(),
            document_url: format!("/api/documents/{}", document_id),
        },
    })
}

/// Follow-up priority derives from the complaint agent's severity grade.
fn complaint_priority(data: &serde_json::Value) -> &'static str {
    match data.get("severity").and_then(|v| v.as_str()) {
        Some(severity) if severity.eq_ignore_ascii_case("high") => "high",
        _ => "normal",
    }
}

/// Record the failing stage on the document, then surface the error.
async fn abort<T>(
    pool: &SqlitePool,
    document_id: i64,
    status: DocumentStatus,
    error: AppError,
) -> AppResult<T> {
    warn!(document_id, status = %status, error = %error, "Pipeline stage failed");

    if let Err(db_error) =
        DatabaseOperations::update_document_status(pool, document_id, status, Some(&error.to_string()))
            .await
    {
        error!(document_id, error = %db_error, "Failed to record pipeline failure");
    }

    Err(error)
}
