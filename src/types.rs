// Type definitions and enums

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Business category of an uploaded document. The label set is closed: the
/// classifier either returns one of the five known intents or `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DocumentIntent {
    Rfq,
    Complaint,
    Invoice,
    Regulation,
    FraudRisk,
    Unknown,
}

impl DocumentIntent {
    /// Parse a classifier label. Unrecognized labels (including the "ERROR"
    /// sentinel the classifier emits for blank or ambiguous text) map to
    /// `Unknown` rather than failing.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "RFQ" => DocumentIntent::Rfq,
            "COMPLAINT" => DocumentIntent::Complaint,
            "INVOICE" => DocumentIntent::Invoice,
            "REGULATION" => DocumentIntent::Regulation,
            "FRAUD_RISK" => DocumentIntent::FraudRisk,
            _ => DocumentIntent::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentIntent::Rfq => "RFQ",
            DocumentIntent::Complaint => "Complaint",
            DocumentIntent::Invoice => "Invoice",
            DocumentIntent::Regulation => "Regulation",
            DocumentIntent::FraudRisk => "Fraud_Risk",
            DocumentIntent::Unknown => "unknown",
        }
    }

    pub const KNOWN: [DocumentIntent; 5] = [
        DocumentIntent::Rfq,
        DocumentIntent::Complaint,
        DocumentIntent::Invoice,
        DocumentIntent::Regulation,
        DocumentIntent::FraudRisk,
    ];
}

impl std::fmt::Display for DocumentIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a document. Each pipeline run moves a document from
/// `Uploaded` to exactly one terminal status; the terminal value names the
/// stage that failed, so operators can diagnose stuck uploads by status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DocumentStatus {
    Uploaded,
    Processed,
    Error,
    IntentError,
    AgentError,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Uploaded => "uploaded",
            DocumentStatus::Processed => "processed",
            DocumentStatus::Error => "error",
            DocumentStatus::IntentError => "intent_error",
            DocumentStatus::AgentError => "agent_error",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub provider: String,
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("The file appears to be empty")]
    EmptyInput,

    #[error("{0}")]
    UnsupportedType(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Could not determine document intent")]
    UnknownIntent,

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Field extraction error: {0}")]
    FieldExtraction(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Client-caused failures (empty, unsupported, unparseable, ambiguous)
    /// map to 4xx; collaborator and internal failures map to 5xx.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyInput
            | AppError::UnsupportedType(_)
            | AppError::Extraction(_)
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownIntent => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Classification(_)
            | AppError::FieldExtraction(_)
            | AppError::LLMApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Routing(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
