//! RFQ Agent
//!
//! Extracts requester details and line items from Request for Quotation
//! documents.

use crate::agents::{run_field_extraction, FieldExtractor};
use crate::config::Config;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use tracing::info;

const SYSTEM_INSTRUCTION: &str =
    "You are a strict RFQ extraction engine. You return exactly one JSON object and nothing else.";

pub struct RfqAgent;

fn build_prompt(text: &str) -> String {
    format!(
        "Extract data from the Request for Quotation (RFQ) document below and return exactly one JSON object.\n\n\
         From the given text, extract:\n\n\
         1. requester_name (string or null)\n\
         2. requester_email (string or null)\n\
         3. requested_items: a list of items in the form:\n\
            [{{\"name\": \"string\", \"specs\": \"string\", \"quantity\": number or null}}]\n\
            - If specs are listed without an item name, guess the name (e.g., 'Laptop').\n\
            - If quantity is not given, use null.\n\
         4. delivery_deadline (string or null)\n\
         5. special_conditions (string or null)\n\
         6. summary (string or null)\n\
         7. contact_details (string or null)\n\n\
         Make sure:\n\
         - You include all 7 fields in the final JSON.\n\
         - You return only a complete and valid JSON object.\n\
         - Do not include any explanations or text outside the JSON.\n\n\
         Here is the RFQ:\n\n{}",
        text
    )
}

#[async_trait]
impl FieldExtractor for RfqAgent {
    fn agent_type(&self) -> &'static str {
        "rfq_agent"
    }

    async fn extract_fields(&self, text: &str, config: &Config) -> AppResult<serde_json::Value> {
        if text.trim().is_empty() {
            return Err(AppError::FieldExtraction("Empty content".to_string()));
        }

        info!(agent = self.agent_type(), text_len = text.len(), "Extracting RFQ fields");
        run_field_extraction(self.agent_type(), SYSTEM_INSTRUCTION, build_prompt(text), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[tokio::test]
    async fn test_blank_input_is_an_explicit_error() {
        let err = RfqAgent
            .extract_fields("  ", &test_config(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FieldExtraction(_)));
    }

    #[test]
    fn test_prompt_names_all_seven_fields() {
        let prompt = build_prompt("Need 20 laptops by March");
        for field in [
            "requester_name",
            "requester_email",
            "requested_items",
            "delivery_deadline",
            "special_conditions",
            "summary",
            "contact_details",
        ] {
            assert!(prompt.contains(field), "prompt missing {field}");
        }
    }
}
