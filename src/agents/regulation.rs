// Regulation agent: compliance summary of regulatory documents.

use crate::agents::{run_field_extraction, FieldExtractor};
use crate::config::Config;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use tracing::info;

const SYSTEM_INSTRUCTION: &str =
    "You are a regulatory affairs assistant summarizing compliance documents.";

pub struct RegulationAgent;

fn build_prompt(text: &str) -> String {
    format!(
        "You are a regulatory assistant. Review this regulation document:\n\n{}\n\n\
         Return a JSON object with:\n\
         - regulation_title\n\
         - effective_date\n\
         - summary\n\
         - impacted_departments\n\
         - compliance_deadline\n\
         - penalties_for_noncompliance\n\n\
         Ensure well-structured JSON only, skip unpresented details.",
        text
    )
}

#[async_trait]
impl FieldExtractor for RegulationAgent {
    fn agent_type(&self) -> &'static str {
        "regulation_agent"
    }

    async fn extract_fields(&self, text: &str, config: &Config) -> AppResult<serde_json::Value> {
        if text.trim().is_empty() {
            return Err(AppError::FieldExtraction("Empty content".to_string()));
        }

        info!(agent = self.agent_type(), text_len = text.len(), "Extracting regulation fields");
        run_field_extraction(self.agent_type(), SYSTEM_INSTRUCTION, build_prompt(text), config).await
    }
}
