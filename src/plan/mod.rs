use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::PlanError;
use crate::log::{self, Stage};
use crate::provider::DynProvider;
use crate::wire::{TripConstraints, TripPlan};
use crate::{extract, prompt};

/// Outcome of one successful generation.
#[derive(Debug, Clone)]
pub struct Generated {
    pub tx: Uuid,
    /// The model's object, untouched. This is what clients receive.
    pub data: Value,
    /// Lenient typed view of `data` for review and rendering.
    pub plan: TripPlan,
    pub warnings: Vec<String>,
    pub artifacts: Option<PathBuf>,
}

/// validate → prompt → provider → extract. Holds no state between calls.
pub struct Planner {
    provider: DynProvider,
    artifacts_root: Option<PathBuf>,
}

impl Planner {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider, artifacts_root: None }
    }

    /// Persist prompt, raw output and plan for every call under `root`.
    pub fn with_artifacts(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifacts_root = Some(root.into());
        self
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub async fn generate(&self, constraints: &TripConstraints) -> Result<Generated, PlanError> {
        if !constraints.has_required_fields() {
            return Err(PlanError::MissingFields);
        }

        let tx = Uuid::new_v4();
        let model = self.provider.model();
        info!(%tx, origin = %constraints.origin, month = %constraints.travel_month,
            provider = self.provider.name(), %model, "generating trip plan");

        let prompt = prompt::trip_prompt(constraints);
        let mut stage = Stage::new(tx, self.provider.name(), &model, &prompt);

        let raw = match self.provider.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(%tx, error = %e, "provider call failed");
                self.save(&stage);
                return Err(e.into());
            }
        };
        debug!(%tx, raw = %raw, "raw provider response");
        stage.response = Some(raw.clone());

        if raw.trim().is_empty() {
            error!(%tx, "provider returned no text");
            self.save(&stage);
            return Err(PlanError::EmptyResponse);
        }

        let data = match extract::trip_plan(&raw) {
            Ok(data) => data,
            Err(e) => {
                error!(%tx, error = %e, raw = %raw, "failed to parse provider response");
                self.save(&stage);
                return Err(e.into());
            }
        };

        let (plan, mut warnings) = match TripPlan::view(&data) {
            Ok(plan) => (plan, Vec::new()),
            Err(e) => (TripPlan::default(), vec![format!("plan could not be read: {e}")]),
        };
        warnings.extend(review(&plan, constraints));
        for w in &warnings {
            warn!(%tx, "plan review: {w}");
        }

        stage.plan = Some(data.clone());
        let artifacts = self.save(&stage);
        Ok(Generated { tx, data, plan, warnings, artifacts })
    }

    fn save(&self, stage: &Stage) -> Option<PathBuf> {
        let root = self.artifacts_root.as_ref()?;
        match log::save_stage(root, stage) {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!(tx = %stage.tx, error = %e, "could not save artifacts");
                None
            }
        }
    }
}

/// Non-gating sanity checks on what the model returned. The plan is passed
/// through unchanged whatever this finds.
pub fn review(plan: &TripPlan, constraints: &TripConstraints) -> Vec<String> {
    let mut warnings = Vec::new();

    if plan.destination.trim().is_empty() {
        warnings.push("plan has no destination".to_string());
    }

    let days = plan.plan_days.len();
    if let Some(n) = constraints.duration_days {
        if days != n as usize {
            warnings.push(format!("asked for {n} days, plan has {days}"));
        }
    }
    let numbered = plan
        .plan_days
        .iter()
        .enumerate()
        .all(|(i, d)| d.day as usize == i + 1);
    if !numbered {
        warnings.push(format!("day numbers are not 1..{days} in order"));
    }

    let b = &plan.budget_summary;
    let parts = b.stay + b.travel + b.food + b.activities;
    if (parts - b.total).abs() > 1.0 {
        warnings.push(format!("budget parts add up to ₹{parts}, total says ₹{}", b.total));
    }

    warnings
}
