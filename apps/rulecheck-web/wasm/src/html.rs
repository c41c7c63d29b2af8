//! Results panel markup
//!
//! Everything coming from the service is escaped; the JS side assigns the
//! string to `innerHTML`.

use rulecheck_core::{ResultRow, ResultsSummary, ResultsView, RuleStatus};

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_summary(summary: &ResultsSummary) -> String {
    format!(
        concat!(
            r#"<div class="summary">"#,
            r#"<div class="summary-card passed"><span class="summary-label">Passed</span><p class="summary-value">{}</p></div>"#,
            r#"<div class="summary-card failed"><span class="summary-label">Failed</span><p class="summary-value">{}</p></div>"#,
            r#"<div class="summary-card average"><span class="summary-label">Avg Score</span><p class="summary-value">{}%</p></div>"#,
            "</div>"
        ),
        summary.passed, summary.failed, summary.average_confidence
    )
}

fn render_row(row: &ResultRow) -> String {
    let badge_class = match row.status {
        RuleStatus::Pass => "badge-pass",
        RuleStatus::Fail => "badge-fail",
    };

    format!(
        concat!(
            r#"<div class="result-row">"#,
            r#"<div class="rule-header"><span class="rule-number">RULE {number}</span>"#,
            r#"<span class="badge {badge_class}">{badge}</span></div>"#,
            r#"<p class="rule-text">{rule}</p>"#,
            r#"<div class="evidence"><p class="section-label">EVIDENCE</p><p class="quote">&quot;{evidence}&quot;</p></div>"#,
            r#"<div class="reasoning"><p class="section-label">REASONING</p><p>{reasoning}</p></div>"#,
            r#"<div class="confidence"><span class="section-label">CONFIDENCE SCORE</span>"#,
            r#"<span class="confidence-value">{confidence}%</span>"#,
            r#"<div class="confidence-track"><div class="confidence-bar confidence-{tier}" style="width: {width}%"></div></div>"#,
            "</div></div>"
        ),
        number = row.number,
        badge_class = badge_class,
        badge = row.badge,
        rule = escape_html(&row.rule),
        evidence = escape_html(&row.evidence),
        reasoning = escape_html(&row.reasoning),
        confidence = row.confidence,
        tier = row.tier.as_str(),
        width = row.bar_width,
    )
}

/// Render summary cards, one row per rule, and the footer line
pub fn render_results_html(view: &ResultsView) -> String {
    let rows: String = view.rows.iter().map(render_row).collect();
    let summary = &view.summary;

    format!(
        concat!(
            r#"<div class="results">{summary}"#,
            r#"<div class="results-table"><h2>Validation Results</h2>{rows}"#,
            r#"<div class="results-footer"><span>Analysis Complete</span>"#,
            r#"<span class="footer-passed">{passed} Passed</span>"#,
            r#"<span class="footer-failed">{failed} Failed</span>"#,
            r#"<span class="footer-average">{average}% Avg</span></div>"#,
            "</div></div>"
        ),
        summary = render_summary(summary),
        rows = rows,
        passed = summary.passed,
        failed = summary.failed,
        average = summary.average_confidence,
    )
}
