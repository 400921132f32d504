//! Output files.
//!
//! - [`xlsx`] - the bulk upload workbook (`campaign.xlsx`)
//! - [`report`] - the validation error report (`error_report.csv`)

pub mod report;
pub mod xlsx;

use serde_json::Value;

use crate::models::OutputRecord;

pub use report::{errors_to_csv, write_error_report};
pub use xlsx::{records_to_xlsx, write_campaign_file};

/// Records as a JSON array, one object per bulk sheet line.
pub fn records_to_json(records: &[OutputRecord]) -> Value {
    Value::Array(records.iter().map(OutputRecord::to_json).collect())
}
