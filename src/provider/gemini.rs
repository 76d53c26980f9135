use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Provider, Settings};
use crate::errors::ProviderError;

/// Google Gemini `generateContent`, optionally grounded with Google Search.
pub struct Gemini {
    settings: Settings,
    client: Client,
}

impl Gemini {
    pub fn new(settings: Settings, client: Client) -> Self {
        Self { settings, client }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: Option<String>,
}

fn request_body<'a>(prompt: &'a str, settings: &Settings) -> GenerateRequest<'a> {
    let tools = if settings.grounding {
        vec![Tool { google_search: GoogleSearch {} }]
    } else {
        Vec::new()
    };
    GenerateRequest {
        contents: vec![Content { role: "user", parts: vec![Part { text: prompt }] }],
        tools,
        generation_config: settings.temperature.map(|temperature| GenerationConfig { temperature }),
    }
}

/// Joins the text parts of the first candidate. Grounded answers often arrive
/// split across several parts.
fn response_text(body: &str) -> Result<String, ProviderError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default())
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> String {
        self.settings.model()
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.settings.api_key()?;
        let model = self.settings.model();
        let url = format!("{}/v1beta/models/{}:generateContent", self.settings.base_url, model);
        debug!(%url, grounding = self.settings.grounding, "gemini: POST");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(prompt, &self.settings))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, bytes = text.len(), "gemini: response");

        if !status.is_success() {
            return Err(ProviderError::Status { status: status.as_u16(), body: text });
        }
        response_text(&text)
    }
}
