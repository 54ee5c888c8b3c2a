use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider.
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    /// Override for the provider's API base URL (proxies, tests).
    pub api_base: Option<String>,
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig) -> AppResult<Self> {
        let adapter: Box<dyn LLMAdapter> = match provider.name.as_str() {
            "google" | "gemini" => match &provider.api_base {
                Some(base) => Box::new(crate::llm::google::GeminiAdapter::with_base_url(
                    &provider.api_key,
                    base,
                )),
                None => Box::new(crate::llm::google::GeminiAdapter::new(&provider.api_key)),
            },
            "openai" => match &provider.api_base {
                Some(base) => Box::new(crate::llm::openai::OpenAIAdapter::with_base_url(
                    &provider.api_key,
                    base,
                )),
                None => Box::new(crate::llm::openai::OpenAIAdapter::new(&provider.api_key)),
            },
            other => {
                return Err(AppError::LLMApi(format!("Unsupported provider: {}", other)));
            }
        };

        Ok(Self { adapter })
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
