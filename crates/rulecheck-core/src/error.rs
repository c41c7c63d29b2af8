//! Error types for the RuleCheck client
//!
//! Every error ends up in front of the user as a single message string, so
//! the `Display` text of each variant is the exact wording shown in the UI.

use thiserror::Error;

use crate::rules::RuleSlot;

pub const SERVER_ERROR_FALLBACK: &str = "Server error occurred";
pub const REQUEST_FAILED_FALLBACK: &str = "Failed to send request";

/// Failures of a call to the validation service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service answered with an error status
    #[error("{0}")]
    Rejected(String),

    /// No response arrived (connection refused, DNS, timeout, aborted fetch)
    #[error("No response from server. Please check if backend is running.")]
    Unreachable,

    /// The request could not be built or the response could not be read
    #[error("{0}")]
    RequestSetup(String),
}

impl ApiError {
    /// Build a rejection from the service-provided message, if any.
    pub fn rejected(message: Option<String>) -> Self {
        match message {
            Some(msg) if !msg.trim().is_empty() => ApiError::Rejected(msg),
            _ => ApiError::Rejected(SERVER_ERROR_FALLBACK.to_string()),
        }
    }

    /// Build a rejection from a raw error response body.
    ///
    /// The service answers errors with `{ "success": false, "message": ... }`;
    /// anything else falls back to the generic server message.
    pub fn from_error_body(body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });
        Self::rejected(message)
    }

    pub fn request_setup(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ApiError::RequestSetup(REQUEST_FAILED_FALLBACK.to_string())
        } else {
            ApiError::RequestSetup(message)
        }
    }
}

/// Why a candidate file was not accepted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRejection {
    #[error("Please select a PDF file")]
    NotPdf,

    #[error("File size must be less than 10MB")]
    TooLarge,
}

/// Submission blocked before any request was sent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Please upload a PDF file")]
    MissingFile,

    #[error("Please fill in {0} (all 3 rules are required)")]
    MissingRule(RuleSlot),

    #[error("Backend server is not running. Please start the server first.")]
    ServerOffline,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Base URL must not be empty")]
    EmptyBaseUrl,

    #[error("Base URL must start with http:// or https://: {0}")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_uses_service_message() {
        let err = ApiError::from_error_body(r#"{"success":false,"message":"PDF is encrypted"}"#);
        assert_eq!(err, ApiError::Rejected("PDF is encrypted".to_string()));
        assert_eq!(err.to_string(), "PDF is encrypted");
    }

    #[test]
    fn test_rejection_falls_back_on_unreadable_body() {
        for body in ["", "<html>502 Bad Gateway</html>", r#"{"error":"x"}"#, r#"{"message":""}"#] {
            let err = ApiError::from_error_body(body);
            assert_eq!(err.to_string(), SERVER_ERROR_FALLBACK, "body: {:?}", body);
        }
    }

    #[test]
    fn test_unreachable_message() {
        assert_eq!(
            ApiError::Unreachable.to_string(),
            "No response from server. Please check if backend is running."
        );
    }

    #[test]
    fn test_request_setup_fallback() {
        assert_eq!(ApiError::request_setup("").to_string(), REQUEST_FAILED_FALLBACK);
        assert_eq!(
            ApiError::request_setup("invalid header value").to_string(),
            "invalid header value"
        );
    }

    #[test]
    fn test_precondition_messages_are_distinct() {
        let messages = [
            PreconditionError::MissingFile.to_string(),
            PreconditionError::MissingRule(RuleSlot::Two).to_string(),
            PreconditionError::ServerOffline.to_string(),
        ];
        assert_eq!(messages[1], "Please fill in Rule 2 (all 3 rules are required)");
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }
}
