//! Intent Classifier
//!
//! Labels extracted document text with one business intent from a closed set.
//! The classifier never raises on blank input: it returns the `ERROR`
//! sentinel instead, which maps to `DocumentIntent::Unknown`.

use crate::agents::complete_prompt;
use crate::config::Config;
use crate::types::{AppError, AppResult, DocumentIntent};
use tracing::info;

const SYSTEM_INSTRUCTION: &str =
    "You are a strict document intent classifier. Respond with a single word and nothing else.";

#[derive(Debug, Clone)]
pub struct IntentClassification {
    pub intent: DocumentIntent,
    pub raw_label: String,
    /// The classifier emits a bare label with no score; confidence is pinned
    /// at 1.0 until the collaborator can produce one.
    pub confidence: f64,
}

pub struct IntentClassifier;

impl IntentClassifier {
    pub async fn classify(text: &str, config: &Config) -> AppResult<IntentClassification> {
        if text.trim().is_empty() {
            return Ok(IntentClassification {
                intent: DocumentIntent::Unknown,
                raw_label: "ERROR".to_string(),
                confidence: 1.0,
            });
        }

        let prompt = Self::build_prompt(text);
        let raw = complete_prompt(config, SYSTEM_INSTRUCTION, prompt, 0.0)
            .await
            .map_err(|e| AppError::Classification(format!("intent classifier failed: {}", e)))?;

        let label = normalize_label(&raw);
        let intent = DocumentIntent::from_label(&label);
        info!(label = %label, intent = %intent, "Intent classified");

        Ok(IntentClassification {
            intent,
            raw_label: label,
            confidence: 1.0,
        })
    }

    fn build_prompt(text: &str) -> String {
        format!(
            "Check the following message: {}\n\n\
             Classify it into one of the following intents (respond in a single word):\n\
             'RFQ', 'Complaint', 'Invoice', 'Regulation', 'Fraud_Risk'.\n\
             If none match, respond with 'ERROR'.",
            text
        )
    }
}

/// Models tend to decorate single-word answers with quotes or a period.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '\'' || c == '"' || c == '`' || c == '.')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("'Complaint'"), "Complaint");
        assert_eq!(normalize_label("RFQ.\n"), "RFQ");
        assert_eq!(normalize_label("  Invoice  "), "Invoice");
    }

    #[tokio::test]
    async fn test_blank_text_returns_error_sentinel_without_llm_call() {
        let config = test_config(None);
        let result = IntentClassifier::classify("   \n  ", &config)
            .await
            .expect("blank input must not raise");

        assert_eq!(result.intent, DocumentIntent::Unknown);
        assert_eq!(result.raw_label, "ERROR");
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_classify_maps_llm_label_to_intent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"text": "Complaint"}]}, "finishReason": "STOP"}]}"#,
            )
            .create_async()
            .await;

        let config = test_config(Some(server.url()));
        let result = IntentClassifier::classify("My order arrived broken and support ignores me", &config)
            .await
            .expect("classification");

        assert_eq!(result.intent, DocumentIntent::Complaint);
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_classifier_failure_is_a_classification_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let config = test_config(Some(server.url()));
        let err = IntentClassifier::classify("some document text", &config)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Classification(_)));
    }
}
