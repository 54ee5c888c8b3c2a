//! Agent System
//!
//! The intent classifier and the per-intent field extraction agents:
//!
//! - **Intent Classifier**: labels extracted text with one business intent
//! - **Field Extractors**: one agent per intent, each returning a structured
//!   record of intent-specific fields
//!
//! ## Dispatch Overview
//!
//! ```text
//! Extracted Text
//!      │
//!      ▼
//! ┌──────────────┐
//! │   Intent     │  → one label from the closed set (or ERROR)
//! │  Classifier  │
//! └──────────────┘
//!      │
//!      ▼
//! ┌──────────────┐
//! │   Routing    │  → finite map: intent → agent
//! └──────────────┘
//!      │
//!      ▼
//! ┌──────────────┐
//! │    Field     │  → structured JSON fields
//! │  Extractor   │
//! └──────────────┘
//! ```

pub mod complaint;
pub mod fraud_risk;
pub mod intent;
pub mod invoice;
pub mod regulation;
pub mod rfq;

// Re-export main components
pub use complaint::ComplaintAgent;
pub use fraud_risk::FraudRiskAgent;
pub use intent::{IntentClassification, IntentClassifier};
pub use invoice::InvoiceAgent;
pub use regulation::RegulationAgent;
pub use rfq::RfqAgent;

use crate::config::Config;
use crate::llm::provider::{LLMProviderConfig, LLM};
use crate::types::{AppError, AppResult, DocumentIntent, LLMMessage, LLMRequest};
use async_trait::async_trait;

/// A per-intent extraction capability. The intent label set is closed, so
/// dispatch is a total lookup over [`DocumentIntent`] rather than open-ended
/// registration.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Stable identifier recorded on agent response rows.
    fn agent_type(&self) -> &'static str;

    /// Extract intent-specific fields from document text. Blank input is an
    /// explicit error, never a silent empty result.
    async fn extract_fields(&self, text: &str, config: &Config) -> AppResult<serde_json::Value>;
}

/// Resolve the one agent responsible for an intent. `Unknown` has no agent
/// and is a routing failure.
pub fn agent_for_intent(intent: DocumentIntent) -> AppResult<&'static dyn FieldExtractor> {
    match intent {
        DocumentIntent::Rfq => Ok(&RfqAgent),
        DocumentIntent::Complaint => Ok(&ComplaintAgent),
        DocumentIntent::Invoice => Ok(&InvoiceAgent),
        DocumentIntent::Regulation => Ok(&RegulationAgent),
        DocumentIntent::FraudRisk => Ok(&FraudRiskAgent),
        DocumentIntent::Unknown => Err(AppError::Routing(format!(
            "no agent available for intent {}",
            intent
        ))),
    }
}

/// One-shot prompt completion against the configured provider.
pub(crate) async fn complete_prompt(
    config: &Config,
    system_instruction: &str,
    prompt: String,
    temperature: f32,
) -> AppResult<String> {
    let api_key = config
        .llm
        .active_api_key()
        .ok_or_else(|| AppError::LLMApi("No LLM API key configured".to_string()))?;

    let llm = LLM::new(LLMProviderConfig {
        name: config.llm.default_provider.clone(),
        api_key,
        api_base: config.llm.api_base.clone(),
    })?;

    let request = LLMRequest {
        provider: config.llm.default_provider.clone(),
        model: config.llm.default_model.clone(),
        messages: vec![LLMMessage::user(prompt)],
        max_tokens: Some(2048),
        temperature: Some(temperature),
        system_instruction: Some(system_instruction.to_string()),
    };

    let response = llm.create_chat_completion(&request).await?;
    Ok(response.content)
}

/// Normalize an agent's raw output into structured data. Models often wrap
/// JSON in markdown fences; if no JSON can be recovered at all, the raw text
/// is kept under a `result` key rather than discarded.
pub fn parse_structured_response(raw: &str) -> serde_json::Value {
    let json_str = if raw.contains("```json") {
        raw.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(raw)
            .trim()
    } else if raw.contains("```") {
        raw.split("```").nth(1).unwrap_or(raw).trim()
    } else {
        raw.trim()
    };

    serde_json::from_str(json_str).unwrap_or_else(|_| serde_json::json!({ "result": raw.trim() }))
}

/// Shared agent body: run the prompt, normalize the output, tag failures
/// with the agent's identity.
pub(crate) async fn run_field_extraction(
    agent_type: &str,
    system_instruction: &str,
    prompt: String,
    config: &Config,
) -> AppResult<serde_json::Value> {
    let raw = complete_prompt(config, system_instruction, prompt, 0.2)
        .await
        .map_err(|e| AppError::FieldExtraction(format!("{}: {}", agent_type, e)))?;

    Ok(parse_structured_response(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_known_intent_routes_to_exactly_one_agent() {
        let mut seen = std::collections::BTreeSet::new();
        for intent in DocumentIntent::KNOWN {
            let agent = agent_for_intent(intent).expect("known intent must route");
            assert!(seen.insert(agent.agent_type()), "duplicate agent for {intent}");
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_unknown_intent_fails_routing() {
        let err = match agent_for_intent(DocumentIntent::Unknown) {
            Ok(_) => panic!("unknown intent must not route"),
            Err(e) => e,
        };
        assert!(matches!(err, AppError::Routing(_)));
        assert!(err.to_string().contains("no agent available for intent unknown"));
    }

    #[test]
    fn test_parse_structured_response_plain_json() {
        let value = parse_structured_response(r#"{"invoice_number": "INV-7"}"#);
        assert_eq!(value, json!({"invoice_number": "INV-7"}));
    }

    #[test]
    fn test_parse_structured_response_fenced_json() {
        let raw = "Here you go:\n```json\n{\"severity\": \"high\"}\n```\nanything else?";
        assert_eq!(parse_structured_response(raw), json!({"severity": "high"}));

        let raw = "```\n{\"severity\": \"low\"}\n```";
        assert_eq!(parse_structured_response(raw), json!({"severity": "low"}));
    }

    #[test]
    fn test_parse_structured_response_wraps_raw_text() {
        let value = parse_structured_response("I could not find any fields.");
        assert_eq!(value, json!({"result": "I could not find any fields."}));
    }
}
