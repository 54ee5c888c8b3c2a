use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub google_api_key: String,
    pub openai_api_key: String,
    pub default_provider: String,
    pub default_model: String,
    /// Override for the provider's API base URL (proxies, tests).
    pub api_base: Option<String>,
}

impl LLMConfig {
    /// API key for the configured default provider, if one is set.
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.default_provider.as_str() {
            "google" | "gemini" => &self.google_api_key,
            "openai" => &self.openai_api_key,
            _ => return None,
        };
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_file_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:8000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://crm.db".to_string()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            llm: LLMConfig {
                google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                default_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "google".to_string()),
                default_model: env::var("LLM_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
                api_base: env::var("LLM_API_BASE").ok(),
            },
            upload: UploadConfig {
                max_file_size: env::var("MAX_FILE_SIZE")
                    .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                    .parse()?,
            },
        })
    }
}

/// Config pointing the LLM layer at a mock server. Shared across module tests.
#[cfg(test)]
pub(crate) fn test_config(api_base: Option<String>) -> Config {
    Config {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_allowed_origins: vec![],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        llm: LLMConfig {
            google_api_key: "test-key".to_string(),
            openai_api_key: String::new(),
            default_provider: "google".to_string(),
            default_model: "gemini-2.0-flash".to_string(),
            api_base,
        },
        upload: UploadConfig {
            max_file_size: 10 * 1024 * 1024,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_llm_config(provider: &str, google: &str, openai: &str) -> LLMConfig {
        LLMConfig {
            google_api_key: google.to_string(),
            openai_api_key: openai.to_string(),
            default_provider: provider.to_string(),
            default_model: "gemini-2.0-flash".to_string(),
            api_base: None,
        }
    }

    #[test]
    fn test_active_api_key_follows_provider() {
        let config = test_llm_config("google", "g-key", "o-key");
        assert_eq!(config.active_api_key(), Some("g-key".to_string()));

        let config = test_llm_config("openai", "g-key", "o-key");
        assert_eq!(config.active_api_key(), Some("o-key".to_string()));
    }

    #[test]
    fn test_active_api_key_missing() {
        let config = test_llm_config("google", "", "o-key");
        assert_eq!(config.active_api_key(), None);

        let config = test_llm_config("unsupported", "g-key", "o-key");
        assert_eq!(config.active_api_key(), None);
    }
}
