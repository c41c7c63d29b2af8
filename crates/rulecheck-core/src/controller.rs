//! Form controller
//!
//! Owns all form state and moves it between four phases:
//!
//! ```text
//!   Idle ──begin_submission──▶ Submitting ──finish(ok)──▶ ShowingResults
//!    ▲          │                   │
//!    │          └─precondition──────┴──finish(err)──────▶ ShowingError
//!    └──────────────────────── reset (from any phase) ────────────┘
//! ```
//!
//! Server availability is tracked separately and only refreshed by the
//! startup health check.
//!
//! Submission is split into `begin_submission` / `finish_submission` so a
//! caller holding the controller behind a `RefCell` never keeps it borrowed
//! across the network call. The ticket's generation lets a late completion
//! be recognised and dropped after a reset.

use serde::Serialize;
use shared_types::{ValidateResponse, ValidationResult};
use tracing::{debug, info, warn};

use crate::api::ValidationApi;
use crate::error::{ApiError, FileRejection, PreconditionError};
use crate::file_selector::{FileMeta, FileSelector, SelectedFile};
use crate::rules::{RuleSet, RuleSlot};

const VALIDATION_FAILED_FALLBACK: &str = "Validation failed";
const UNEXPECTED_ERROR_FALLBACK: &str = "An error occurred during validation";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    ShowingResults,
    ShowingError,
}

/// What the startup health check found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Health check not finished yet
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Snapshot of one submission attempt
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    generation: u64,
    file: SelectedFile,
    rules: RuleSet,
}

impl SubmissionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    phase: Phase,
    server: ServerStatus,
    files: FileSelector,
    rules: RuleSet,
    results: Option<Vec<ValidationResult>>,
    error: Option<String>,
    generation: u64,
    /// Bumped by every reset; file reads started before a reset are dropped
    resets: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn server_status(&self) -> ServerStatus {
        self.server
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.files.selected()
    }

    pub fn file_rejection(&self) -> Option<FileRejection> {
        self.files.rejection()
    }

    pub fn is_dragging(&self) -> bool {
        self.files.is_dragging()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn results(&self) -> Option<&[ValidationResult]> {
        self.results.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Advisory: the submit control needs the server known online and no
    /// request in flight. A pending health check disables it too.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.server == ServerStatus::Online
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Analyzing..."
        } else {
            "Validate Document"
        }
    }

    // ------------------------------------------------------------------
    // Server availability
    // ------------------------------------------------------------------

    pub fn set_server_online(&mut self, online: bool) {
        self.server = if online {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        };
        info!(status = ?self.server, "server availability updated");
    }

    /// Run the one-shot health check and record the outcome.
    pub async fn refresh_health(&mut self, api: &dyn ValidationApi) -> ServerStatus {
        let online = api.check_health().await;
        self.set_server_online(online);
        self.server
    }

    // ------------------------------------------------------------------
    // File selection
    // ------------------------------------------------------------------

    /// Screen a candidate before its bytes are read.
    pub fn screen_file(&mut self, meta: &FileMeta) -> Result<(), FileRejection> {
        self.files.screen(meta)
    }

    /// Offer a picked or dropped file; a rejection keeps the current file.
    pub fn offer_file(&mut self, file: SelectedFile) -> Result<(), FileRejection> {
        self.files.offer(file)
    }

    /// Reset counter to capture before reading a file's bytes asynchronously
    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Offer a file whose read started at reset count `resets`.
    ///
    /// Returns `Ok(false)` without touching the selection when the form was
    /// reset while the bytes were being read.
    pub fn offer_file_if(&mut self, resets: u64, file: SelectedFile) -> Result<bool, FileRejection> {
        if resets != self.resets {
            debug!(name = %file.name(), "dropping file read that predates a reset");
            return Ok(false);
        }
        self.files.offer(file).map(|()| true)
    }

    pub fn drag_over(&mut self) {
        self.files.drag_over();
    }

    pub fn drag_leave(&mut self) {
        self.files.drag_leave();
    }

    pub fn drop_received(&mut self) {
        self.files.drop_received();
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Apply an edit to one rule field. Editing dismisses the current error.
    pub fn set_rule(&mut self, slot: RuleSlot, text: impl Into<String>) {
        self.rules.set(slot, text);
        if self.error.take().is_some() && self.phase == Phase::ShowingError {
            self.phase = Phase::Idle;
        }
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Check preconditions and enter `Submitting`.
    ///
    /// Clears any previous error and results first. On a failed precondition
    /// the controller shows that error and no request must be made.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, PreconditionError> {
        self.error = None;
        self.results = None;
        // A stale file rejection would otherwise mask the precondition message
        self.files.dismiss_rejection();

        match self.check_preconditions() {
            Ok(file) => {
                self.generation += 1;
                self.phase = Phase::Submitting;
                info!(generation = self.generation, file = %file.name(), "submission started");
                Ok(SubmissionTicket {
                    generation: self.generation,
                    file,
                    rules: self.rules.clone(),
                })
            }
            Err(err) => {
                debug!("submission blocked: {}", err);
                self.error = Some(err.to_string());
                self.phase = Phase::ShowingError;
                Err(err)
            }
        }
    }

    fn check_preconditions(&self) -> Result<SelectedFile, PreconditionError> {
        let file = self
            .files
            .selected()
            .ok_or(PreconditionError::MissingFile)?;

        if let Some(slot) = self.rules.first_missing() {
            return Err(PreconditionError::MissingRule(slot));
        }

        if self.server != ServerStatus::Online {
            return Err(PreconditionError::ServerOffline);
        }

        Ok(file.clone())
    }

    /// Apply the outcome of the request started by `ticket`.
    ///
    /// Returns false when the outcome was dropped because the form was reset
    /// or resubmitted after the ticket was issued.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<ValidateResponse, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation || self.phase != Phase::Submitting {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale validation outcome"
            );
            return false;
        }

        match outcome {
            Ok(response) if response.success => {
                let results = response.results.unwrap_or_default();
                info!(count = results.len(), "validation results received");
                self.results = Some(results);
                self.phase = Phase::ShowingResults;
            }
            Ok(response) => {
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| VALIDATION_FAILED_FALLBACK.to_string());
                warn!("validation unsuccessful: {}", message);
                self.show_error(message);
            }
            Err(err) => {
                let message = err.to_string();
                warn!("validation request failed: {}", message);
                if message.trim().is_empty() {
                    self.show_error(UNEXPECTED_ERROR_FALLBACK.to_string());
                } else {
                    self.show_error(message);
                }
            }
        }
        true
    }

    fn show_error(&mut self, message: String) {
        self.error = Some(message);
        self.phase = Phase::ShowingError;
    }

    /// Begin, call the service and finish in one go.
    ///
    /// Holds `&mut self` across the request, so it suits callers that own
    /// the controller outright.
    pub async fn submit(&mut self, api: &dyn ValidationApi) -> Phase {
        let ticket = match self.begin_submission() {
            Ok(ticket) => ticket,
            Err(_) => return self.phase,
        };
        let outcome = api.validate(ticket.file(), ticket.rules()).await;
        self.finish_submission(ticket, outcome);
        self.phase
    }

    /// Clear file, rules, results and error and return to `Idle`.
    ///
    /// An in-flight request is not cancelled; its outcome is dropped when it
    /// arrives. Server availability is kept.
    pub fn reset(&mut self) {
        self.files.clear();
        self.rules.clear();
        self.results = None;
        self.error = None;
        self.generation += 1;
        self.resets += 1;
        self.phase = Phase::Idle;
        debug!(generation = self.generation, "form reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{RuleStatus, PDF_MIME_TYPE};
    use std::cell::Cell;

    use async_trait::async_trait;

    struct FakeApi {
        healthy: bool,
        outcome: Result<ValidateResponse, ApiError>,
        validate_calls: Cell<usize>,
    }

    impl FakeApi {
        fn returning(outcome: Result<ValidateResponse, ApiError>) -> Self {
            Self {
                healthy: true,
                outcome,
                validate_calls: Cell::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.validate_calls.get()
        }
    }

    #[async_trait(?Send)]
    impl ValidationApi for FakeApi {
        async fn check_health(&self) -> bool {
            self.healthy
        }

        async fn validate(
            &self,
            _file: &SelectedFile,
            _rules: &RuleSet,
        ) -> Result<ValidateResponse, ApiError> {
            self.validate_calls.set(self.validate_calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn pdf() -> SelectedFile {
        SelectedFile::new(
            FileMeta::new("policy.pdf", 2048, PDF_MIME_TYPE),
            b"%PDF-1.7 test".to_vec(),
        )
    }

    fn results() -> Vec<ValidationResult> {
        vec![
            ValidationResult {
                rule: "has purpose".to_string(),
                status: RuleStatus::Pass,
                evidence: "Purpose: ...".to_string(),
                reasoning: "found".to_string(),
                confidence: 80,
            },
            ValidationResult {
                rule: "has date".to_string(),
                status: RuleStatus::Fail,
                evidence: String::new(),
                reasoning: "no date".to_string(),
                confidence: 20,
            },
        ]
    }

    fn ok_response() -> ValidateResponse {
        ValidateResponse {
            success: true,
            results: Some(results()),
            message: None,
        }
    }

    /// Controller with a file, three rules and an online server
    fn ready() -> Controller {
        let mut controller = Controller::new();
        controller.offer_file(pdf()).unwrap();
        controller.set_rule(RuleSlot::One, "has purpose");
        controller.set_rule(RuleSlot::Two, "has date");
        controller.set_rule(RuleSlot::Three, "defines a term");
        controller.set_server_online(true);
        controller
    }

    #[test]
    fn test_initial_state() {
        let controller = Controller::new();
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.server_status(), ServerStatus::Unknown);
        assert!(!controller.can_submit());
        assert_eq!(controller.submit_label(), "Validate Document");
    }

    #[test]
    fn test_submit_enabled_only_once_server_is_online() {
        let mut controller = ready();
        controller.server = ServerStatus::Unknown;
        assert!(!controller.can_submit());

        controller.set_server_online(true);
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn test_missing_file_blocks_before_network() {
        let api = FakeApi::returning(Ok(ok_response()));
        let mut controller = ready();
        controller.reset();
        controller.set_server_online(true);
        controller.set_rule(RuleSlot::One, "a");
        controller.set_rule(RuleSlot::Two, "b");
        controller.set_rule(RuleSlot::Three, "c");

        assert_eq!(controller.submit(&api).await, Phase::ShowingError);
        assert_eq!(controller.error(), Some("Please upload a PDF file"));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_rule_blocks_with_field_message() {
        let api = FakeApi::returning(Ok(ok_response()));

        for slot in RuleSlot::ALL {
            let mut controller = ready();
            controller.set_rule(slot, "   \t");
            assert_eq!(controller.submit(&api).await, Phase::ShowingError);
            assert_eq!(
                controller.error(),
                Some(PreconditionError::MissingRule(slot).to_string().as_str())
            );
        }
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_server_blocks_submission() {
        let api = FakeApi::returning(Ok(ok_response()));
        let mut controller = ready();
        controller.set_server_online(false);

        assert!(!controller.can_submit());
        assert_eq!(controller.submit(&api).await, Phase::ShowingError);
        assert_eq!(
            controller.error(),
            Some("Backend server is not running. Please start the server first.")
        );
        assert_eq!(api.calls(), 0);
    }

    #[test]
    fn test_unknown_server_status_blocks_submission() {
        let mut controller = ready();
        controller.server = ServerStatus::Unknown;
        assert_eq!(
            controller.begin_submission().unwrap_err(),
            PreconditionError::ServerOffline
        );
    }

    #[test]
    fn test_preconditions_checked_in_order() {
        // No file, no rules, offline: the file message wins
        let mut controller = Controller::new();
        controller.set_server_online(false);
        assert_eq!(
            controller.begin_submission().unwrap_err(),
            PreconditionError::MissingFile
        );

        // File but no rules, offline: the rule message wins
        controller.offer_file(pdf()).unwrap();
        assert_eq!(
            controller.begin_submission().unwrap_err(),
            PreconditionError::MissingRule(RuleSlot::One)
        );
    }

    #[tokio::test]
    async fn test_successful_submission_shows_results() {
        let api = FakeApi::returning(Ok(ok_response()));
        let mut controller = ready();

        assert_eq!(controller.submit(&api).await, Phase::ShowingResults);
        assert_eq!(controller.results().unwrap(), results().as_slice());
        assert_eq!(controller.error(), None);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsuccessful_payload_shows_service_message() {
        let api = FakeApi::returning(Ok(ValidateResponse {
            success: false,
            results: None,
            message: Some("PDF contains no extractable text".to_string()),
        }));
        let mut controller = ready();

        assert_eq!(controller.submit(&api).await, Phase::ShowingError);
        assert_eq!(controller.error(), Some("PDF contains no extractable text"));
        assert!(controller.results().is_none());
    }

    #[tokio::test]
    async fn test_unsuccessful_payload_without_message_uses_fallback() {
        let api = FakeApi::returning(Ok(ValidateResponse::default()));
        let mut controller = ready();

        controller.submit(&api).await;
        assert_eq!(controller.error(), Some(VALIDATION_FAILED_FALLBACK));
    }

    #[tokio::test]
    async fn test_api_errors_surface_their_message() {
        let cases = [
            (ApiError::Rejected("Rules too long".to_string()), "Rules too long"),
            (
                ApiError::Unreachable,
                "No response from server. Please check if backend is running.",
            ),
            (ApiError::RequestSetup(String::new()), UNEXPECTED_ERROR_FALLBACK),
        ];

        for (err, expected) in cases {
            let api = FakeApi::returning(Err(err));
            let mut controller = ready();
            assert_eq!(controller.submit(&api).await, Phase::ShowingError);
            assert_eq!(controller.error(), Some(expected));
        }
    }

    #[test]
    fn test_submitting_disables_submit() {
        let mut controller = ready();
        let _ticket = controller.begin_submission().unwrap();
        assert_eq!(controller.phase(), Phase::Submitting);
        assert!(!controller.can_submit());
        assert_eq!(controller.submit_label(), "Analyzing...");
    }

    #[test]
    fn test_resubmission_clears_previous_results() {
        let mut controller = ready();
        let ticket = controller.begin_submission().unwrap();
        controller.finish_submission(ticket, Ok(ok_response()));
        assert!(controller.results().is_some());

        let _ticket = controller.begin_submission().unwrap();
        assert!(controller.results().is_none());
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_reset_mid_submission_drops_late_outcome() {
        let mut controller = ready();
        let ticket = controller.begin_submission().unwrap();

        controller.reset();
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.selected_file().is_none());
        assert_eq!(controller.rules(), &RuleSet::default());

        assert!(!controller.finish_submission(ticket, Ok(ok_response())));
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.results().is_none());
    }

    #[test]
    fn test_reset_clears_everything_from_any_phase() {
        let mut showing_results = ready();
        let ticket = showing_results.begin_submission().unwrap();
        showing_results.finish_submission(ticket, Ok(ok_response()));

        let mut showing_error = ready();
        showing_error.set_rule(RuleSlot::Two, "");
        let _ = showing_error.begin_submission();

        let mut submitting = ready();
        let _ticket = submitting.begin_submission().unwrap();

        for mut controller in [showing_results, showing_error, submitting, ready()] {
            controller.drag_over();
            controller.reset();
            assert_eq!(controller.phase(), Phase::Idle);
            assert!(controller.selected_file().is_none());
            assert_eq!(controller.rules(), &RuleSet::default());
            assert!(controller.results().is_none());
            assert!(controller.error().is_none());
            assert!(controller.file_rejection().is_none());
            assert!(!controller.is_dragging());
            assert_eq!(controller.server_status(), ServerStatus::Online);
        }
    }

    #[test]
    fn test_editing_a_rule_dismisses_error() {
        let mut controller = ready();
        controller.set_rule(RuleSlot::Three, "");
        let _ = controller.begin_submission();
        assert_eq!(controller.phase(), Phase::ShowingError);

        controller.set_rule(RuleSlot::Three, "d");
        assert_eq!(controller.error(), None);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_rejected_file_keeps_selection() {
        let mut controller = ready();
        let doc = SelectedFile::new(
            FileMeta::new("notes.docx", 10, "application/msword"),
            Vec::new(),
        );
        assert_eq!(controller.offer_file(doc), Err(FileRejection::NotPdf));
        assert_eq!(controller.selected_file().unwrap().name(), "policy.pdf");
        assert_eq!(controller.file_rejection(), Some(FileRejection::NotPdf));
    }

    #[test]
    fn test_submission_dismisses_stale_file_rejection() {
        let mut controller = Controller::new();
        controller.set_server_online(true);
        let png = SelectedFile::new(FileMeta::new("photo.png", 10, "image/png"), Vec::new());
        assert_eq!(controller.offer_file(png), Err(FileRejection::NotPdf));

        assert_eq!(
            controller.begin_submission().unwrap_err(),
            PreconditionError::MissingFile
        );
        assert_eq!(controller.file_rejection(), None);
        assert_eq!(controller.error(), Some("Please upload a PDF file"));
    }

    #[test]
    fn test_file_read_finishing_after_reset_is_dropped() {
        let mut controller = ready();
        let resets = controller.reset_count();

        controller.reset();
        let late = SelectedFile::new(FileMeta::new("late.pdf", 10, PDF_MIME_TYPE), Vec::new());
        assert_eq!(controller.offer_file_if(resets, late), Ok(false));
        assert!(controller.selected_file().is_none());
    }

    #[test]
    fn test_file_read_without_reset_is_offered() {
        let mut controller = Controller::new();
        let resets = controller.reset_count();

        assert_eq!(controller.offer_file_if(resets, pdf()), Ok(true));
        assert_eq!(controller.selected_file().unwrap().name(), "policy.pdf");

        let doc = SelectedFile::new(FileMeta::new("notes.txt", 10, "text/plain"), Vec::new());
        assert_eq!(
            controller.offer_file_if(resets, doc),
            Err(FileRejection::NotPdf)
        );
        assert_eq!(controller.selected_file().unwrap().name(), "policy.pdf");
    }

    #[tokio::test]
    async fn test_refresh_health() {
        let mut api = FakeApi::returning(Ok(ok_response()));
        let mut controller = Controller::new();

        assert_eq!(controller.refresh_health(&api).await, ServerStatus::Online);

        api.healthy = false;
        assert_eq!(controller.refresh_health(&api).await, ServerStatus::Offline);
        assert!(!controller.can_submit());
    }
}
