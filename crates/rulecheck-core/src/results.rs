//! Results aggregation and view model
//!
//! Pure functions over the service's `ValidationResult` list. Nothing here
//! mutates the results; the view only adds derived display fields.

use serde::Serialize;
use shared_types::{RuleStatus, ValidationResult};

/// Visual tier of a confidence bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// `>= 70` high, `40..=69` medium, below 40 low
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            70..=u8::MAX => ConfidenceTier::High,
            40..=69 => ConfidenceTier::Medium,
            _ => ConfidenceTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub passed: usize,
    pub failed: usize,
    pub average_confidence: u32,
}

impl ResultsSummary {
    /// `None` for an empty result list
    pub fn from_results(results: &[ValidationResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        Some(Self {
            passed: results.iter().filter(|r| r.status == RuleStatus::Pass).count(),
            failed: results.iter().filter(|r| r.status == RuleStatus::Fail).count(),
            average_confidence: average_confidence(results),
        })
    }
}

/// Mean confidence rounded half-up to the nearest integer (0 when empty)
pub fn average_confidence(results: &[ValidationResult]) -> u32 {
    let count = results.len() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = results.iter().map(|r| r.confidence as u64).sum();
    ((2 * sum + count) / (2 * count)) as u32
}

/// One rendered rule outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    /// 1-based position in submission order
    pub number: usize,
    pub rule: String,
    pub status: RuleStatus,
    pub badge: &'static str,
    pub evidence: String,
    pub reasoning: String,
    pub confidence: u8,
    /// Bar width in percent, clamped to 100
    pub bar_width: u8,
    pub tier: ConfidenceTier,
}

impl ResultRow {
    fn from_result(number: usize, result: &ValidationResult) -> Self {
        Self {
            number,
            rule: result.rule.clone(),
            status: result.status,
            badge: result.status.label(),
            evidence: result.evidence.clone(),
            reasoning: result.reasoning.clone(),
            confidence: result.confidence,
            bar_width: result.confidence.min(100),
            tier: ConfidenceTier::from_confidence(result.confidence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub summary: ResultsSummary,
    pub rows: Vec<ResultRow>,
}

impl ResultsView {
    /// Build the view, or `None` when there is nothing to show
    pub fn build(results: &[ValidationResult]) -> Option<Self> {
        let summary = ResultsSummary::from_results(results)?;
        let rows = results
            .iter()
            .enumerate()
            .map(|(idx, result)| ResultRow::from_result(idx + 1, result))
            .collect();
        Some(Self { summary, rows })
    }
}
