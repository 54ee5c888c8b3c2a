// Invoice agent: billing facts and line items.

use crate::agents::{run_field_extraction, FieldExtractor};
use crate::config::Config;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use tracing::info;

const SYSTEM_INSTRUCTION: &str =
    "You are an accounts assistant extracting structured billing data from invoices.";

pub struct InvoiceAgent;

fn build_prompt(text: &str) -> String {
    format!(
        "You are an invoice processing AI. Review the invoice below:\n\n{}\n\n\
         Return a JSON object with:\n\
         - invoice_number\n\
         - vendor_name\n\
         - customer_name\n\
         - invoice_date\n\
         - due_date\n\
         - line_items (list of {{\"description\", \"quantity\", \"unit_price\", \"amount\"}})\n\
         - subtotal\n\
         - tax\n\
         - total_amount\n\
         - currency\n\
         - payment_terms\n\n\
         Ensure well-structured JSON only, skip unpresented details.",
        text
    )
}

#[async_trait]
impl FieldExtractor for InvoiceAgent {
    fn agent_type(&self) -> &'static str {
        "invoice_agent"
    }

    async fn extract_fields(&self, text: &str, config: &Config) -> AppResult<serde_json::Value> {
        if text.trim().is_empty() {
            return Err(AppError::FieldExtraction("Empty content".to_string()));
        }

        info!(agent = self.agent_type(), text_len = text.len(), "Extracting invoice fields");
        run_field_extraction(self.agent_type(), SYSTEM_INSTRUCTION, build_prompt(text), config).await
    }
}
