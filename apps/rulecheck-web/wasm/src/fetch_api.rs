//! `ValidationApi` over the browser `fetch` API
//!
//! Timeouts are enforced with an `AbortController` armed by `setTimeout`.
//! A rejected fetch (network failure or abort) means no response arrived and
//! maps to `ApiError::Unreachable`; failures while building the request map
//! to `ApiError::RequestSetup`.

use async_trait::async_trait;
use js_sys::{Array, Uint8Array};
use rulecheck_core::api::{health_from_response, is_success_status, validate_from_response};
use rulecheck_core::{ApiError, ClientConfig, RuleSet, SelectedFile, ValidationApi};
use shared_types::{form_fields, ValidateResponse, PDF_MIME_TYPE};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, AbortSignal, Blob, BlobPropertyBag, FormData, Request, RequestInit,
    RequestMode, Response, Window,
};

pub struct FetchApi {
    config: ClientConfig,
}

/// Best-effort message out of a thrown JS value
fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_default()
}

fn setup_error(value: JsValue) -> ApiError {
    ApiError::request_setup(js_message(&value))
}

fn build_request(
    method: &str,
    url: &str,
    body: Option<&FormData>,
    signal: &AbortSignal,
) -> Result<Request, JsValue> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    opts.set_signal(Some(signal));
    if let Some(form) = body {
        // No explicit Content-Type: the browser adds the multipart boundary
        opts.set_body(form);
    }
    Request::new_with_str_and_init(url, &opts)
}

fn build_form(file: &SelectedFile, rules: &RuleSet) -> Result<FormData, JsValue> {
    let form = FormData::new()?;

    let bytes = Uint8Array::from(file.contents());
    let options = BlobPropertyBag::new();
    options.set_type(PDF_MIME_TYPE);
    let blob = Blob::new_with_u8_array_sequence_and_options(&Array::of1(&bytes), &options)?;
    form.append_with_blob_and_filename(form_fields::PDF_FILE, &blob, file.name())?;

    for (field, text) in rules.fields() {
        form.append_with_str(field, text)?;
    }
    Ok(form)
}

async fn fetch_text(window: &Window, request: &Request) -> Result<(u16, String), ApiError> {
    let response = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|_| ApiError::Unreachable)?;
    let response: Response = response.dyn_into().map_err(setup_error)?;

    let text = JsFuture::from(response.text().map_err(setup_error)?)
        .await
        .map_err(|_| ApiError::Unreachable)?;
    Ok((response.status(), text.as_string().unwrap_or_default()))
}

impl FetchApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch `request`, aborting through `controller` after `timeout_ms`.
    async fn send(
        &self,
        request: Request,
        controller: &AbortController,
        timeout_ms: u64,
    ) -> Result<(u16, String), ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::request_setup("No window"))?;

        let abort = controller.clone();
        let on_timeout = Closure::once(move || abort.abort());
        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                on_timeout.as_ref().unchecked_ref(),
                timeout_ms.min(i32::MAX as u64) as i32,
            )
            .map_err(setup_error)?;

        let outcome = fetch_text(&window, &request).await;

        window.clear_timeout_with_handle(timer);
        drop(on_timeout);
        outcome
    }
}

#[async_trait(?Send)]
impl ValidationApi for FetchApi {
    async fn check_health(&self) -> bool {
        let Ok(controller) = AbortController::new() else {
            return false;
        };
        let Ok(request) = build_request(
            "GET",
            &self.config.health_url(),
            None,
            &controller.signal(),
        ) else {
            return false;
        };

        match self
            .send(request, &controller, self.config.health_timeout_ms)
            .await
        {
            Ok((status, body)) => health_from_response(status, &body),
            Err(err) => {
                web_sys::console::warn_1(&format!("Health check failed: {}", err).into());
                false
            }
        }
    }

    async fn validate(
        &self,
        file: &SelectedFile,
        rules: &RuleSet,
    ) -> Result<ValidateResponse, ApiError> {
        let controller = AbortController::new().map_err(setup_error)?;
        let form = build_form(file, rules).map_err(setup_error)?;
        let request = build_request(
            "POST",
            &self.config.validate_url(),
            Some(&form),
            &controller.signal(),
        )
        .map_err(setup_error)?;

        let (status, body) = self
            .send(request, &controller, self.config.validate_timeout_ms)
            .await?;

        if !is_success_status(status) {
            web_sys::console::warn_1(&format!("Validation rejected: HTTP {}", status).into());
        }
        validate_from_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_kept() {
        let api = FetchApi::new(ClientConfig::new("https://checker.example.com/").unwrap());
        assert_eq!(
            api.config().validate_url(),
            "https://checker.example.com/api/validate"
        );
    }
}
