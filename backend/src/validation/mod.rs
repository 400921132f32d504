//! Field validation for uploaded campaign parameter tables.
//!
//! Every row is checked against every rule; no check stops another, so a
//! single row can contribute several messages. Messages are ordered by row
//! (1-based, input order) and then by rule:
//!
//! 1. ASIN starts with `B0` and is exactly 10 characters
//! 2. Daily Budget is a number in `[2, 1000]`
//! 3. Keyword Text is present and no word exceeds 21 characters
//! 4. Match Type is exact, broad or phrase (any case)
//! 5. Bid is a number in `[0.02, 15]`
//! 6. Portfolio ID, when present, is numeric
//! 7. Percentage, when present, is a number in `[0, 900]`
//! 8. Naming convention tag, when present, is at most 10 characters without whitespace
//!
//! A table missing required columns is reported column by column and its
//! rows are not checked.
//!
//! # Example
//!
//! ```rust,ignore
//! use campgen::{parse_bytes_auto, validate_parsed};
//!
//! let parsed = parse_bytes_auto(bytes)?;
//! let errors = validate_parsed(&parsed);
//! if errors.is_empty() {
//!     // safe to expand
//! }
//! ```

use serde_json::Value;

use crate::models::{cell, input, parse_number, MatchType};
use crate::parser::ParseResult;

pub const ASIN_PREFIX: &str = "B0";
pub const ASIN_LENGTH: usize = 10;
pub const DAILY_BUDGET_MIN: f64 = 2.0;
pub const DAILY_BUDGET_MAX: f64 = 1000.0;
pub const KEYWORD_WORD_MAX: usize = 21;
pub const BID_MIN: f64 = 0.02;
pub const BID_MAX: f64 = 15.0;
pub const PERCENTAGE_MIN: f64 = 0.0;
pub const PERCENTAGE_MAX: f64 = 900.0;
pub const NAMING_TAG_MAX: usize = 10;

/// Report required columns absent from the header row, in declaration order.
pub fn validate_headers(headers: &[String]) -> Vec<String> {
    input::REQUIRED
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|missing| format!("Missing required column: {}", missing))
        .collect()
}

/// Validate a whole table. An empty result means every row can be expanded.
pub fn validate_table(headers: &[String], records: &[Value]) -> Vec<String> {
    let missing = validate_headers(headers);
    if !missing.is_empty() {
        return missing;
    }

    records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| validate_row(i + 1, record))
        .collect()
}

/// Validate a parsed CSV.
pub fn validate_parsed(parsed: &ParseResult) -> Vec<String> {
    validate_table(&parsed.headers, &parsed.records)
}

/// Check one record. `row` is the 1-based number used in messages.
pub fn validate_row(row: usize, record: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_asin(cell(record, input::ASIN)) {
        errors.push(format!(
            "Invalid ASIN in row {}: must start with '{}' and be exactly {} characters",
            row, ASIN_PREFIX, ASIN_LENGTH
        ));
    }

    if !in_range(cell(record, input::DAILY_BUDGET), DAILY_BUDGET_MIN, DAILY_BUDGET_MAX) {
        errors.push(format!(
            "Invalid Daily Budget in row {}: must be a number between {} and {}",
            row, DAILY_BUDGET_MIN, DAILY_BUDGET_MAX
        ));
    }

    match cell(record, input::KEYWORD_TEXT) {
        None => errors.push(format!("Invalid Keyword Text in row {}: value is missing", row)),
        Some(text) => {
            let long_words = long_keyword_words(text);
            if !long_words.is_empty() {
                errors.push(format!(
                    "Invalid Keyword Text in row {}: words longer than {} characters: {}",
                    row,
                    KEYWORD_WORD_MAX,
                    long_words.join(", ")
                ));
            }
        }
    }

    if cell(record, input::MATCH_TYPE).and_then(MatchType::parse).is_none() {
        errors.push(format!(
            "Invalid Match Type in row {}: must be exact, broad or phrase",
            row
        ));
    }

    if !in_range(cell(record, input::BID), BID_MIN, BID_MAX) {
        errors.push(format!(
            "Invalid Bid in row {}: must be a number between {} and {}",
            row, BID_MIN, BID_MAX
        ));
    }

    if let Some(portfolio) = cell(record, input::PORTFOLIO_ID) {
        if parse_number(portfolio).is_none() {
            errors.push(format!(
                "Invalid Portfolio ID in row {}: must be numeric",
                row
            ));
        }
    }

    if let Some(percentage) = cell(record, input::PERCENTAGE) {
        if !in_range(Some(percentage), PERCENTAGE_MIN, PERCENTAGE_MAX) {
            errors.push(format!(
                "Invalid Percentage in row {}: must be a number between {} and {}",
                row, PERCENTAGE_MIN, PERCENTAGE_MAX
            ));
        }
    }

    if let Some(tag) = cell(record, input::NAMING_TAG) {
        if !is_valid_naming_tag(tag) {
            errors.push(format!(
                "Invalid Naming convention tag in row {}: must be at most {} characters with no spaces",
                row, NAMING_TAG_MAX
            ));
        }
    }

    errors
}

fn is_valid_asin(asin: Option<&str>) -> bool {
    asin.is_some_and(|a| a.starts_with(ASIN_PREFIX) && a.chars().count() == ASIN_LENGTH)
}

fn in_range(raw: Option<&str>, min: f64, max: f64) -> bool {
    raw.and_then(parse_number)
        .is_some_and(|n| (min..=max).contains(&n))
}

fn long_keyword_words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|word| word.chars().count() > KEYWORD_WORD_MAX)
        .collect()
}

fn is_valid_naming_tag(tag: &str) -> bool {
    tag.chars().count() <= NAMING_TAG_MAX && !tag.chars().any(char::is_whitespace)
}
