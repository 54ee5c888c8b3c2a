use crate::config::Config;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

// Persistence entities (normalized schema)
// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub upload_time: chrono::DateTime<chrono::Utc>,
    pub processed_content: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct IntentRecord {
    pub id: i64,
    pub document_id: i64,
    pub intent_type: String,
    pub confidence: f64,
    pub detected_at: chrono::DateTime<chrono::Utc>,
}

/// Audit record of one field-extraction run. `response_data` and `metadata`
/// are stored as JSON text and decoded on read.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AgentResponse {
    pub id: i64,
    pub document_id: i64,
    pub intent_id: i64,
    pub agent_type: String,
    pub response_data: serde_json::Value,
    pub processed_at: chrono::DateTime<chrono::Utc>,
    pub metadata: serde_json::Value,
}

/// Downstream action item. Status moves pending -> completed, driven by the
/// CRM side, never by the pipeline.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FollowUp {
    pub id: i64,
    pub document_id: i64,
    pub action_type: String,
    pub action_details: serde_json::Value,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One row of the paginated document listing: the document plus its
/// latest-known intent and its metadata map.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocumentListItem {
    pub id: i64,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub upload_time: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub error_message: Option<String>,
    pub intent_type: Option<String>,
    pub confidence: Option<f64>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Dashboard view over agent_responses joined with documents and intents.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentDataView {
    pub id: i64,
    pub document_id: i64,
    pub processed_at: chrono::DateTime<chrono::Utc>,
    pub agent_type: String,
    pub file_name: String,
    pub intent: String,
    pub data: serde_json::Value,
    pub status: String,
    pub requires_followup: bool,
    pub followup_notes: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StatsReport {
    pub total_documents: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_intent: BTreeMap<String, i64>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

// API Request/Response types

/// Unified result returned for every processed upload.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProcessEnvelope {
    pub status: String,
    pub document_id: i64,
    pub intent: String,
    pub confidence: f64,
    pub data: serde_json::Value,
    pub metadata: EnvelopeMetadata,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EnvelopeMetadata {
    pub filename: String,
    pub processed_at: chrono::DateTime<chrono::Utc>,
    pub document_url: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ListDocumentsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub intent: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct DocumentDetail {
    pub document: Document,
    pub intents: Vec<IntentRecord>,
    pub responses: Vec<AgentResponse>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AgentDataQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct FollowUpRequest {
    pub notes: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
