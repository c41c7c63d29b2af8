//! Client-side core of the RuleCheck PDF compliance checker
//!
//! A user picks one PDF, writes three natural-language rules and submits them
//! to a remote validation service. Everything here is target independent:
//!
//! - `file_selector`: MIME/size screening shared by picker and drag-and-drop
//! - `rules`: the three rule fields
//! - `results`: pass/fail/confidence aggregation and the results view model
//! - `controller`: form state machine and submission orchestration
//! - `api`: the `ValidationApi` seam, plus a reqwest client behind `native`
//!
//! The browser bundle (`rulecheck-wasm`) implements `ValidationApi` on top of
//! `fetch` and drives the same controller.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod file_selector;
pub mod results;
pub mod rules;
pub mod view;

pub use api::ValidationApi;
#[cfg(feature = "native")]
pub use api::http::HttpApi;
pub use config::ClientConfig;
pub use controller::{Controller, Phase, ServerStatus, SubmissionTicket};
pub use error::{ApiError, ConfigError, FileRejection, PreconditionError};
pub use file_selector::{format_file_size, screen_file, FileMeta, SelectedFile};
pub use results::{ConfidenceTier, ResultRow, ResultsSummary, ResultsView};
pub use rules::{RuleSet, RuleSlot};
pub use view::FormView;

pub use shared_types::{RuleStatus, ValidateResponse, ValidationResult};
