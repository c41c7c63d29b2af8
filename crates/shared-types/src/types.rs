/// Outcome of a single rule as decided by the validation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
}

impl RuleStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleStatus::Pass)
    }

    /// Badge text shown next to the rule
    pub fn label(&self) -> &'static str {
        match self {
            RuleStatus::Pass => "PASS",
            RuleStatus::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub rule: String, // Echo of the submitted rule text
    pub status: RuleStatus,
    #[serde(default)]
    pub evidence: String, // Excerpt quoted from the document
    #[serde(default)]
    pub reasoning: String,
    pub confidence: u8, // Percentage, 0-100
}

/// Body of `POST /api/validate`
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ValidationResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// Only an exact `"ok"` counts as healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
