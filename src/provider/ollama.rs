use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Provider, Settings};
use crate::errors::ProviderError;

/// Local Ollama chat endpoint. No key, no grounding.
pub struct Ollama {
    settings: Settings,
    client: Client,
}

impl Ollama {
    pub fn new(settings: Settings, client: Client) -> Self {
        if settings.grounding {
            warn!("ollama: search grounding is not supported, ignoring");
        }
        Self { settings, client }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> String {
        self.settings.model()
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let model = self.settings.model();
        let url = format!("{}/api/chat", self.settings.base_url);
        let body = ChatRequest {
            model: &model,
            messages: vec![Msg { role: "user", content: prompt }],
            stream: false,
            options: self.settings.temperature.map(|temperature| OllamaOptions { temperature }),
        };
        debug!(%url, %model, "ollama: POST");

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, bytes = text.len(), "ollama: response");

        if !status.is_success() {
            return Err(ProviderError::Status { status: status.as_u16(), body: text });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(parsed.message.content)
    }
}
