use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Everything seen during one generation, filled in as the pipeline advances.
#[derive(Debug, Clone)]
pub struct Stage {
    pub tx: Uuid,
    pub timestamp: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    pub prompt: String,
    pub response: Option<String>,
    /// Decoded plan exactly as extracted.
    pub plan: Option<Value>,
}

impl Stage {
    pub fn new(tx: Uuid, provider: &str, model: &str, prompt: &str) -> Self {
        Self {
            tx,
            timestamp: Utc::now(),
            provider: provider.to_string(),
            model: model.to_string(),
            prompt: prompt.to_string(),
            response: None,
            plan: None,
        }
    }

    fn outcome(&self) -> &'static str {
        match (&self.response, &self.plan) {
            (_, Some(_)) => "ok",
            (Some(_), None) => "unparsed",
            (None, None) => "provider-error",
        }
    }
}

#[derive(Serialize)]
struct Meta<'a> {
    tx: Uuid,
    timestamp: DateTime<Utc>,
    provider: &'a str,
    model: &'a str,
    outcome: &'a str,
}

pub fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".escaply").join("tx").join(tx.to_string())
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.persist(path)
        .with_context(|| format!("persisting {}", path.display()))?;
    Ok(())
}

/// Writes `meta.json`, `prompt.txt` and whatever of `response.txt` /
/// `plan.json` the stage reached. Returns the transaction directory.
pub fn save_stage(root: &Path, stage: &Stage) -> Result<PathBuf> {
    let dir = tx_dir(root, stage.tx);
    fs::create_dir_all(&dir)?;

    let meta = Meta {
        tx: stage.tx,
        timestamp: stage.timestamp,
        provider: &stage.provider,
        model: &stage.model,
        outcome: stage.outcome(),
    };
    write_atomic(&dir.join("meta.json"), serde_json::to_string_pretty(&meta)?.as_bytes())?;
    write_atomic(&dir.join("prompt.txt"), stage.prompt.as_bytes())?;

    if let Some(raw) = &stage.response {
        write_atomic(&dir.join("response.txt"), raw.as_bytes())?;
    }
    if let Some(plan) = &stage.plan {
        write_atomic(&dir.join("plan.json"), serde_json::to_string_pretty(plan)?.as_bytes())?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_failure_keeps_only_prompt_and_meta() {
        let root = tempfile::tempdir().unwrap();
        let stage = Stage::new(Uuid::new_v4(), "gemini", "gemini-1.5-flash", "plan me a trip");
        let dir = save_stage(root.path(), &stage).unwrap();

        assert_eq!(dir, tx_dir(root.path(), stage.tx));
        assert_eq!(fs::read_to_string(dir.join("prompt.txt")).unwrap(), "plan me a trip");
        assert!(!dir.join("response.txt").exists());
        assert!(!dir.join("plan.json").exists());

        let meta: Value = serde_json::from_str(&fs::read_to_string(dir.join("meta.json")).unwrap()).unwrap();
        assert_eq!(meta["outcome"], "provider-error");
        assert_eq!(meta["model"], "gemini-1.5-flash");
    }

    #[test]
    fn unparsed_output_is_kept_verbatim() {
        let root = tempfile::tempdir().unwrap();
        let mut stage = Stage::new(Uuid::new_v4(), "openai", "gpt-4.1-mini", "p");
        stage.response = Some("no json here".into());
        let dir = save_stage(root.path(), &stage).unwrap();
        assert_eq!(fs::read_to_string(dir.join("response.txt")).unwrap(), "no json here");
        let meta: Value = serde_json::from_str(&fs::read_to_string(dir.join("meta.json")).unwrap()).unwrap();
        assert_eq!(meta["outcome"], "unparsed");
    }

    #[test]
    fn saving_twice_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let mut stage = Stage::new(Uuid::new_v4(), "gemini", "m", "p");
        save_stage(root.path(), &stage).unwrap();
        stage.response = Some("{}".into());
        stage.plan = Some(json!({ "destination": "Kasol", "surprise_element": "Kheerganga trek" }));
        let dir = save_stage(root.path(), &stage).unwrap();
        let saved: Value = serde_json::from_str(&fs::read_to_string(dir.join("plan.json")).unwrap()).unwrap();
        assert_eq!(saved["surprise_element"], "Kheerganga trek");
    }
}
