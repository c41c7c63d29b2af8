//! reqwest implementation of `ValidationApi` for native targets

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared_types::{form_fields, ValidateResponse, PDF_MIME_TYPE};
use tracing::{debug, info, warn};

use super::{health_from_response, validate_from_response, ValidationApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::file_selector::SelectedFile;
use crate::rules::RuleSet;

pub struct HttpApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::request_setup(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_form(file: &SelectedFile, rules: &RuleSet) -> Result<Form, ApiError> {
        let part = Part::bytes(file.contents().to_vec())
            .file_name(file.name().to_string())
            .mime_str(PDF_MIME_TYPE)
            .map_err(|e| ApiError::request_setup(e.to_string()))?;

        let mut form = Form::new().part(form_fields::PDF_FILE, part);
        for (field, text) in rules.fields() {
            form = form.text(field, text.to_string());
        }
        Ok(form)
    }
}

/// Map a failed `send()` onto the three client error kinds
fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::request_setup(err.to_string())
    } else {
        // Connect failures, timeouts and broken connections: no response
        warn!("validation service unreachable: {}", err);
        ApiError::Unreachable
    }
}

#[async_trait(?Send)]
impl ValidationApi for HttpApi {
    async fn check_health(&self) -> bool {
        let response = match self
            .client
            .get(self.config.health_url())
            .timeout(self.config.health_timeout())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("health check failed: {}", e);
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "health check returned error status");
            return false;
        }

        match response.text().await {
            Ok(body) => health_from_response(status.as_u16(), &body),
            Err(e) => {
                debug!("health check body unreadable: {}", e);
                false
            }
        }
    }

    async fn validate(
        &self,
        file: &SelectedFile,
        rules: &RuleSet,
    ) -> Result<ValidateResponse, ApiError> {
        let form = Self::build_form(file, rules)?;
        info!(
            url = %self.config.validate_url(),
            file = %file.name(),
            bytes = file.contents().len(),
            "submitting document for validation"
        );

        let response = self
            .client
            .post(self.config.validate_url())
            .timeout(self.config.validate_timeout())
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(ApiError::Unreachable),
            Err(e) if status.is_success() => return Err(ApiError::request_setup(e.to_string())),
            Err(_) => String::new(),
        };

        if !status.is_success() {
            warn!(%status, "validation service rejected the request");
        }
        validate_from_response(status.as_u16(), &body)
    }
}
