use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::ProviderKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub provider: ProviderKind,
    /// Model used when the override env var is unset.
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub model_env: Option<String>,
    pub base_url: Option<String>,
    pub grounding: bool,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub save_artifacts: bool,
    pub artifacts_root: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            provider: ProviderKind::Gemini,
            model: None,
            api_key_env: None,
            model_env: None,
            base_url: None,
            grounding: true,
            temperature: Some(1.5),
            timeout_secs: None,
            save_artifacts: false,
            artifacts_root: ".".into(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn api_key_env(&self) -> Option<String> {
        self.api_key_env
            .clone()
            .or_else(|| self.provider.default_key_env().map(str::to_string))
    }

    pub fn model_env(&self) -> String {
        self.model_env
            .clone()
            .unwrap_or_else(|| self.provider.default_model_env().to_string())
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }
}
