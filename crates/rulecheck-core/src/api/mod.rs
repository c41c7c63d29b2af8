//! ValidationApi trait: the boundary between the form and the remote service
//!
//! Two calls, both over HTTP:
//! - `GET /health` answers `{ "status": "ok" }` when the service is up
//! - `POST /api/validate` takes the PDF plus three rules as multipart form data
//!
//! The trait is `?Send` so the browser implementation can await `JsFuture`s.

#[cfg(feature = "native")]
pub mod http;

use async_trait::async_trait;
use shared_types::{HealthResponse, ValidateResponse};

use crate::error::ApiError;
use crate::file_selector::SelectedFile;
use crate::rules::RuleSet;

#[async_trait(?Send)]
pub trait ValidationApi {
    /// True only when the service reports exactly `"ok"` within the health
    /// timeout. Never fails: every problem reads as "offline".
    async fn check_health(&self) -> bool;

    /// Upload the file and rules and return the decoded service payload.
    async fn validate(
        &self,
        file: &SelectedFile,
        rules: &RuleSet,
    ) -> Result<ValidateResponse, ApiError>;
}

/// Interpret a health response body
pub fn is_healthy_body(body: &str) -> bool {
    serde_json::from_str::<HealthResponse>(body)
        .map(|health| health.is_ok())
        .unwrap_or(false)
}

/// Decode a successful validate response body
pub fn decode_validate_body(body: &str) -> Result<ValidateResponse, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::request_setup(format!("Invalid response from server: {}", e)))
}

pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Health verdict for a response that arrived
pub fn health_from_response(status: u16, body: &str) -> bool {
    is_success_status(status) && is_healthy_body(body)
}

/// Map a validate response that arrived: error statuses carry the service
/// message, success bodies are decoded.
pub fn validate_from_response(status: u16, body: &str) -> Result<ValidateResponse, ApiError> {
    if !is_success_status(status) {
        return Err(ApiError::from_error_body(body));
    }
    decode_validate_body(body)
}
