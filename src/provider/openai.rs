use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{Provider, Settings};
use crate::errors::ProviderError;

/// OpenAI-compatible chat completions. The prompt goes out as a single user
/// message. There is no search grounding on this endpoint.
pub struct OpenAIProvider {
    settings: Settings,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(settings: Settings, client: Client) -> Self {
        if settings.grounding {
            warn!("openai: search grounding is not supported, ignoring");
        }
        Self { settings, client }
    }
}

fn request_body(model: &str, prompt: &str, temperature: Option<f32>) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "user", "content": prompt }
        ],
    });
    if let Some(t) = temperature {
        body["temperature"] = json!(t);
    }
    body
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

fn response_text(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> String {
        self.settings.model()
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.settings.api_key()?;
        let model = self.settings.model();
        let url = format!("{}/v1/chat/completions", self.settings.base_url);
        debug!(%url, %model, "openai: POST");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body(&model, prompt, self.settings.temperature))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, bytes = text.len(), "openai: response");

        if !status.is_success() {
            return Err(ProviderError::Status { status: status.as_u16(), body: text });
        }
        response_text(&text)
    }
}
