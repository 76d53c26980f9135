use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::PlanError;
use crate::plan::Planner;
use crate::render;
use crate::wire::{ApiResponse, Diagnostics, TripConstraints, TripPlan};

const FORM_PAGE: &str = include_str!("../../assets/index.html");
const ITINERARY_PAGE: &str = include_str!("../../assets/itinerary.html");

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub config: Arc<Config>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingFields,

    /// Carries the provider's raw message for operators.
    #[error("Failed to generate trip plan (provider error)")]
    Provider(String),

    #[error("Failed to generate trip plan")]
    Internal,

    #[error("Invalid trip plan")]
    BadPlan(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, details) = match &self {
            ApiError::MissingFields => (StatusCode::BAD_REQUEST, None),
            ApiError::Provider(raw) => (StatusCode::INTERNAL_SERVER_ERROR, Some(raw.clone())),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, None),
            ApiError::BadPlan(why) => (StatusCode::BAD_REQUEST, Some(why.clone())),
        };
        (code, Json(ApiResponse::fail(self.to_string(), details))).into_response()
    }
}

impl From<PlanError> for ApiError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::MissingFields => ApiError::MissingFields,
            PlanError::Provider(p) => ApiError::Provider(p.to_string()),
            PlanError::EmptyResponse | PlanError::Extract(_) => ApiError::Internal,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/itinerary", get(itinerary_page))
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/export", post(export_plan))
        .route("/api/test", get(diagnostics))
        .with_state(state)
}

async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}

async fn itinerary_page() -> Html<&'static str> {
    Html(ITINERARY_PAGE)
}

/// The body is decoded by hand so a missing `Content-Type` still reaches
/// field validation.
async fn generate_plan(State(st): State<AppState>, body: Bytes) -> Result<Json<ApiResponse>, ApiError> {
    let constraints: TripConstraints = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "unreadable generate-plan body");
        ApiError::Internal
    })?;
    let generated = st.planner.generate(&constraints).await?;
    info!(tx = %generated.tx, destination = %generated.plan.destination, "trip plan ready");
    Ok(Json(ApiResponse::ok(generated.data)))
}

/// Accepts the `data` object exactly as `/api/generate-plan` returned it.
async fn export_plan(body: Bytes) -> Result<Response, ApiError> {
    let data: Value = serde_json::from_slice(&body).map_err(|e| ApiError::BadPlan(e.to_string()))?;
    let plan = TripPlan::view(&data).map_err(|e| ApiError::BadPlan(e.to_string()))?;
    let filename = render::export_filename(&plan.destination);
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
    ];
    Ok((headers, render::text_report(&plan)).into_response())
}

/// Credential and model status, read from the environment on every call.
pub fn diagnostics_for(cfg: &Config) -> Diagnostics {
    let key_len = cfg
        .api_key_env()
        .and_then(|var| std::env::var(var).ok())
        .map(|k| k.len())
        .unwrap_or(0);
    let model = std::env::var(cfg.model_env())
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "not-set".to_string());
    Diagnostics { has_api_key: key_len > 0, api_key_length: key_len, model }
}

async fn diagnostics(State(st): State<AppState>) -> Json<Diagnostics> {
    Json(diagnostics_for(&st.config))
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(
        %addr,
        provider = state.planner.provider().name(),
        model = %state.planner.provider().model(),
        "escaply listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("http server stopped")
}
