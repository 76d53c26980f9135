use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::ProviderError;

pub mod gemini;
pub mod ollama;
pub mod openai;

/// A text-completion backend. One prompt in, the model's raw text out.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Model that the next call will use.
    fn model(&self) -> String;

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

pub type DynProvider = Arc<dyn Provider>;

/// Settings shared by every adapter. Key and model override are env var
/// names, read on each call.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub model_env: String,
    pub api_key_env: Option<String>,
    pub base_url: String,
    pub grounding: bool,
    pub temperature: Option<f32>,
}

impl Settings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            model: cfg.model(),
            model_env: cfg.model_env(),
            api_key_env: cfg.api_key_env(),
            base_url: cfg.base_url().trim_end_matches('/').to_string(),
            grounding: cfg.grounding,
            temperature: cfg.temperature,
        }
    }

    pub fn model(&self) -> String {
        match std::env::var(&self.model_env) {
            Ok(m) if !m.trim().is_empty() => m,
            _ => self.model.clone(),
        }
    }

    pub fn api_key(&self) -> Result<String, ProviderError> {
        let Some(var) = &self.api_key_env else {
            return Ok(String::new());
        };
        match std::env::var(var) {
            Ok(k) if !k.is_empty() => Ok(k),
            _ => Err(ProviderError::MissingApiKey(var.clone())),
        }
    }
}

fn http_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("building HTTP client")
}

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    let settings = Settings::from_config(cfg);
    let client = http_client(cfg.timeout_secs)?;
    Ok(match cfg.provider {
        ProviderKind::Gemini => Arc::new(gemini::Gemini::new(settings, client)),
        ProviderKind::OpenAI => Arc::new(openai::OpenAIProvider::new(settings, client)),
        ProviderKind::Ollama => Arc::new(ollama::Ollama::new(settings, client)),
    })
}
