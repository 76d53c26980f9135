use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} env var is not set")] MissingApiKey(String),
    #[error("request failed: {0}")] Http(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")] Status { status: u16, body: String },
    #[error("failed to parse provider response: {0}")] Decode(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ExtractError {
    #[error("no JSON object found in model output")] NoObject,
    #[error("invalid JSON in model output: {0}")] InvalidJson(String),
    #[error("extraction pattern failed to compile: {0}")] Pattern(String),
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("missing required fields")] MissingFields,
    #[error("provider error: {0}")] Provider(#[from] ProviderError),
    #[error("no response from provider")] EmptyResponse,
    #[error("invalid response format: {0}")] Extract(#[from] ExtractError),
}
