//! Complaint Agent
//!
//! Extracts complaint facts, including a severity grade that drives
//! follow-up priority downstream.

use crate::agents::{run_field_extraction, FieldExtractor};
use crate::config::Config;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use tracing::info;

const SYSTEM_INSTRUCTION: &str =
    "You are a customer service analyst extracting structured facts from complaint documents.";

pub struct ComplaintAgent;

fn build_prompt(text: &str) -> String {
    format!(
        "You are a customer service AI. Analyze the complaint below:\n\n{}\n\n\
         Return a JSON object with:\n\
         - customer_name\n\
         - product_or_service\n\
         - issue_description\n\
         - date_of_incident\n\
         - requested_action\n\
         - contact_details\n\
         - severity (one of \"high\", \"medium\", \"low\")\n\n\
         Ensure well-structured JSON only, skip unpresented details.",
        text
    )
}

#[async_trait]
impl FieldExtractor for ComplaintAgent {
    fn agent_type(&self) -> &'static str {
        "complaint_agent"
    }

    async fn extract_fields(&self, text: &str, config: &Config) -> AppResult<serde_json::Value> {
        if text.trim().is_empty() {
            return Err(AppError::FieldExtraction("Empty content".to_string()));
        }

        info!(agent = self.agent_type(), text_len = text.len(), "Extracting complaint fields");
        run_field_extraction(self.agent_type(), SYSTEM_INSTRUCTION, build_prompt(text), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_requests_severity() {
        let prompt = build_prompt("The device caught fire");
        assert!(prompt.contains("severity"));
        assert!(prompt.contains("issue_description"));
    }
}
