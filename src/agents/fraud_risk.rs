// Fraud risk agent: incident facts from fraud reports.

use crate::agents::{run_field_extraction, FieldExtractor};
use crate::config::Config;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use tracing::info;

const SYSTEM_INSTRUCTION: &str =
    "You are a fraud detection analyst extracting structured facts from incident reports.";

pub struct FraudRiskAgent;

fn build_prompt(text: &str) -> String {
    format!(
        "You're a fraud detection analyst. Examine the following report:\n\n{}\n\n\
         Extract and return a JSON object with:\n\
         - incident_type\n\
         - description\n\
         - suspected_entity\n\
         - amount_involved\n\
         - dates\n\
         - recommended_action\n\
         - urgency_level\n\n\
         Ensure well-structured JSON only, skip unpresented details.",
        text
    )
}

#[async_trait]
impl FieldExtractor for FraudRiskAgent {
    fn agent_type(&self) -> &'static str {
        "fraud_risk_agent"
    }

    async fn extract_fields(&self, text: &str, config: &Config) -> AppResult<serde_json::Value> {
        if text.trim().is_empty() {
            return Err(AppError::FieldExtraction("Empty content".to_string()));
        }

        info!(agent = self.agent_type(), text_len = text.len(), "Extracting fraud risk fields");
        run_field_extraction(self.agent_type(), SYSTEM_INSTRUCTION, build_prompt(text), config).await
    }
}
