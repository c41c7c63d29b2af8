//! Serializable snapshot of the whole form for the UI layer

use serde::Serialize;

use crate::controller::{Controller, Phase, ServerStatus};
use crate::file_selector::format_file_size;
use crate::results::ResultsView;
use crate::rules::RuleSlot;

pub const OFFLINE_BANNER: &str = "Backend server is offline. Please start the server first.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFieldView {
    pub label: String,
    pub field: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub phase: Phase,
    pub server_status: ServerStatus,
    pub offline_banner: Option<&'static str>,
    pub file: Option<FileSummary>,
    pub dragging: bool,
    /// Shown under the upload area
    pub upload_error: Option<String>,
    /// Shown under the rule inputs
    pub form_error: Option<String>,
    pub rules: Vec<RuleFieldView>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub results: Option<ResultsView>,
}

impl FormView {
    pub fn from_controller(controller: &Controller) -> Self {
        let file = controller.selected_file().map(|f| FileSummary {
            name: f.name().to_string(),
            size_label: format_file_size(f.size()),
        });

        // A rejected candidate always reports under the upload area; other
        // errors go there only while no file is selected.
        let error = controller.error().map(str::to_string);
        let (upload_error, form_error) = match (controller.file_rejection(), file.is_some()) {
            (Some(rejection), true) => (Some(rejection.to_string()), error),
            (Some(rejection), false) => (Some(rejection.to_string()), None),
            (None, true) => (None, error),
            (None, false) => (error, None),
        };

        let rules = RuleSlot::ALL
            .iter()
            .map(|slot| {
                let value = controller.rules().get(*slot).to_string();
                RuleFieldView {
                    label: slot.to_string(),
                    field: slot.field_name(),
                    filled: !value.is_empty(),
                    value,
                    placeholder: slot.placeholder(),
                }
            })
            .collect();

        let offline_banner =
            (controller.server_status() == ServerStatus::Offline).then_some(OFFLINE_BANNER);

        Self {
            phase: controller.phase(),
            server_status: controller.server_status(),
            offline_banner,
            file,
            dragging: controller.is_dragging(),
            upload_error,
            form_error,
            rules,
            submit_enabled: controller.can_submit(),
            submit_label: controller.submit_label(),
            results: controller.results().and_then(ResultsView::build),
        }
    }
}
