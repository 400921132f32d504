//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::pipeline::CsvInfo;

/// Response of `POST /api/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Unique job identifier, echoed in the server logs
    pub job_id: String,

    /// "valid" or "invalid"
    pub status: String,

    pub row_count: usize,

    pub columns: Vec<String>,

    /// Every validation message, in report order
    pub errors: Vec<String>,
}

impl ValidationResponse {
    pub fn new(job_id: String, csv_info: CsvInfo, errors: Vec<String>) -> Self {
        Self {
            job_id,
            status: if errors.is_empty() { "valid" } else { "invalid" }.to_string(),
            row_count: csv_info.row_count,
            columns: csv_info.headers,
            errors,
        }
    }
}

/// New job identifier.
pub fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

/// `Content-Disposition` value offering `file_name` as a download.
pub fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

/// Create an error response body
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": new_job_id(),
        "status": "error",
        "error": error,
        "errors": []
    })
}
