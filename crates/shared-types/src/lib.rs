pub mod types;

pub use types::{HealthResponse, RuleStatus, ValidateResponse, ValidationResult};

/// The only MIME type the validation service accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Upload limit enforced before any request is made (10 MiB).
pub const MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;

/// Multipart field names of `POST /api/validate`.
pub mod form_fields {
    pub const PDF_FILE: &str = "pdfFile";
    pub const RULE_1: &str = "rule1";
    pub const RULE_2: &str = "rule2";
    pub const RULE_3: &str = "rule3";
}
