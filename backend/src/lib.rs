//! # Campgen - Sponsored Products bulk sheet generator
//!
//! Campgen reads a CSV of campaign parameters (one line per ASIN and keyword),
//! validates every field and expands each row into the campaign, ad group,
//! product ad and keyword lines of a bulk upload spreadsheet.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Validator  │────▶│   Expander    │──▶ campaign.xlsx
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (all rules) │     │ (ids + names) │
//! └─────────────┘     └─────────────┘     └──────┬──────┘     └───────────────┘
//!                                                └──────────────────────────────▶ error_report.csv
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campgen::{generate_from_path, records_to_xlsx, GenerateOptions};
//!
//! let result = generate_from_path("input.csv".as_ref(), GenerateOptions::default())?;
//! if result.is_valid() {
//!     std::fs::write("campaign.xlsx", records_to_xlsx(result.records())?)?;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Fixed bulk sheet values and server settings
//! - [`models`] - Input rows and output records
//! - [`parser`] - CSV parsing with auto-detection
//! - [`validation`] - Field rules
//! - [`transform`] - Expander, id/clock sources and pipeline
//! - [`export`] - Workbook and error report writers
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Output
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, ExportError, PipelineError, RowError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CellValue, Column, Entity, InputRow, MatchType, OutputRecord};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_json, decode_content, detect_delimiter, detect_encoding, parse_bytes_auto,
    parse_csv_file_auto, parse_str, ParseResult,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_headers, validate_parsed, validate_row, validate_table};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    campaign_name, expand, expand_row, Clock, FixedClock, IdGenerator, RandomIdGenerator,
    SystemClock,
};

pub use transform::pipeline::{
    generate_from_bytes, generate_from_parsed, generate_from_path, to_input_rows, validate_bytes,
    validate_path, CsvInfo, GenerateOptions, Outcome, PipelineResult,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{
    errors_to_csv, records_to_json, records_to_xlsx, write_campaign_file, write_error_report,
};

// Server
pub mod server {
    pub use crate::api::server::{build_router, start_server};
    pub use crate::config::ServerConfig;
}
