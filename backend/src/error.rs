//! Error types for the campaign generation pipeline.
//!
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`RowError`] - a record that cannot become a typed [`crate::models::InputRow`]
//! - [`ExportError`] - spreadsheet and report writing errors
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Field-level data problems (a budget out of range, a bad ASIN...) are not
//! errors here: the validator collects them as plain messages.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV content at a given line.
    #[error("Line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl CsvError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// Row Conversion Errors
// =============================================================================

/// A record that does not satisfy the typed row contract.
///
/// Only reachable when rows are expanded without passing validation first.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Row {row}: missing value for '{column}'")]
    MissingValue { row: usize, column: String },

    #[error("Row {row}: '{value}' is not a valid {column}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while producing output files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Returned by [`crate::transform::pipeline::generate_from_path`] and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Row conversion error.
    #[error("Row error: {0}")]
    Row(#[from] RowError),

    /// Output writing error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Header present but no data rows.
    #[error("No rows to process")]
    EmptyInput,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
