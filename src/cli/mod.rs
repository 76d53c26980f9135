use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Config;
use crate::wire::{TravelStyle, TripConstraints, TripType};

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    pub fn default_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }

    pub fn default_model_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_MODEL",
            ProviderKind::OpenAI => "OPENAI_MODEL",
            ProviderKind::Ollama => "OLLAMA_MODEL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::OpenAI => "https://api.openai.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "escaply", version, about = "AI trip planner: web form, plan generation and itinerary export")]
pub struct Args {
    /// TOML config file; flags below override it.
    #[arg(long, env = "ESCAPLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, default_value_t = false, global = true)]
    pub no_grounding: bool,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false, global = true)]
    pub save_artifacts: bool,

    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    /// Listen address for the web server, with or without `serve`.
    #[arg(long, env = "ESCAPLY_ADDR", global = true)]
    pub addr: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the planner form, itinerary page and JSON API.
    Serve,
    /// Generate one plan from the terminal.
    Plan(PlanArgs),
    /// Report credential and model configuration.
    Check,
}

#[derive(ClapArgs, Debug)]
pub struct PlanArgs {
    #[arg(long)]
    pub origin: String,

    #[arg(long)]
    pub month: String,

    #[arg(long)]
    pub days: Option<u32>,

    #[arg(long)]
    pub budget: Option<String>,

    #[arg(long, value_enum)]
    pub trip_type: Option<TripType>,

    #[arg(long, value_enum)]
    pub style: Option<TravelStyle>,

    /// Write the result here instead of only printing it.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write JSON instead of the text report.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl PlanArgs {
    pub fn constraints(&self) -> TripConstraints {
        TripConstraints {
            origin: self.origin.clone(),
            duration_days: self.days,
            budget_range: self.budget.clone(),
            trip_type: self.trip_type,
            travel_month: self.month.clone(),
            travel_style: self.style,
        }
    }
}

impl Args {
    /// Layers command-line overrides on top of a loaded config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(p) = self.provider {
            cfg.provider = p;
        }
        if let Some(m) = &self.model {
            cfg.model = Some(m.clone());
        }
        if let Some(u) = &self.base_url {
            cfg.base_url = Some(u.clone());
        }
        if self.no_grounding {
            cfg.grounding = false;
        }
        if self.timeout_secs.is_some() {
            cfg.timeout_secs = self.timeout_secs;
        }
        if self.save_artifacts {
            cfg.save_artifacts = true;
        }
        if let Some(addr) = &self.addr {
            cfg.bind_addr = addr.clone();
        }
    }
}
