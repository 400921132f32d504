//! High-level pipeline: parse, validate, then expand.
//!
//! Either every row passes validation and the whole table is expanded, or
//! nothing is expanded and the validation messages are returned instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use campgen::{generate_from_path, GenerateOptions, Outcome};
//! use std::path::Path;
//!
//! let result = generate_from_path(Path::new("campaigns.csv"), GenerateOptions::default())?;
//! match result.outcome {
//!     Outcome::Generated { records } => println!("{} records", records.len()),
//!     Outcome::Invalid { errors } => eprintln!("{} problems", errors.len()),
//! }
//! ```

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use super::clock::{Clock, SystemClock};
use super::expander::expand;
use super::ids::{IdGenerator, RandomIdGenerator};
use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::error::{PipelineError, RowError};
use crate::models::{InputRow, OutputRecord};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};
use crate::validation::validate_parsed;

/// Options for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Add a negative exact keyword to broad and phrase campaigns
    pub cross_negation: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            cross_negation: true,
        }
    }
}

/// CSV file information
#[derive(Debug, Clone)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl From<&ParseResult> for CsvInfo {
    fn from(parsed: &ParseResult) -> Self {
        Self {
            encoding: parsed.encoding.clone(),
            delimiter: parsed.delimiter,
            headers: parsed.headers.clone(),
            row_count: parsed.records.len(),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// At least one validation message; nothing was expanded.
    Invalid { errors: Vec<String> },
    /// Every row was valid.
    Generated { records: Vec<OutputRecord> },
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub csv_info: CsvInfo,
    pub outcome: Outcome,
}

impl PipelineResult {
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, Outcome::Generated { .. })
    }

    /// Validation messages (empty on success).
    pub fn errors(&self) -> &[String] {
        match &self.outcome {
            Outcome::Invalid { errors } => errors,
            Outcome::Generated { .. } => &[],
        }
    }

    /// Generated records (empty on failure).
    pub fn records(&self) -> &[OutputRecord] {
        match &self.outcome {
            Outcome::Generated { records } => records,
            Outcome::Invalid { .. } => &[],
        }
    }
}

/// Run the pipeline on a CSV file.
pub fn generate_from_path(
    path: &Path,
    options: GenerateOptions,
) -> Result<PipelineResult, PipelineError> {
    let parsed = parse_csv_file_auto(path)?;
    generate_from_parsed(parsed, &options, &mut RandomIdGenerator::new(), &SystemClock)
}

/// Run the pipeline on uploaded CSV bytes.
pub fn generate_from_bytes(
    bytes: &[u8],
    options: GenerateOptions,
) -> Result<PipelineResult, PipelineError> {
    let parsed = parse_bytes_auto(bytes)?;
    generate_from_parsed(parsed, &options, &mut RandomIdGenerator::new(), &SystemClock)
}

/// Run the pipeline on parsed data with explicit identifier and date sources.
pub fn generate_from_parsed<G, C>(
    parsed: ParseResult,
    options: &GenerateOptions,
    ids: &mut G,
    clock: &C,
) -> Result<PipelineResult, PipelineError>
where
    G: IdGenerator + ?Sized,
    C: Clock + ?Sized,
{
    let (csv_info, errors) = check_parsed(&parsed);

    if !errors.is_empty() {
        return Ok(PipelineResult {
            csv_info,
            outcome: Outcome::Invalid { errors },
        });
    }

    if parsed.records.is_empty() {
        log_error("CSV has a header but no rows");
        return Err(PipelineError::EmptyInput);
    }

    let rows = to_input_rows(&parsed.records)?;

    log_info(format!(
        "⚙️  Expanding {} rows (cross negation: {})...",
        rows.len(),
        if options.cross_negation { "yes" } else { "no" }
    ));
    let records = expand(&rows, options.cross_negation, ids, clock);
    print_expansion_summary(&records);

    Ok(PipelineResult {
        csv_info,
        outcome: Outcome::Generated { records },
    })
}

/// Parse and validate uploaded bytes without expanding anything.
pub fn validate_bytes(bytes: &[u8]) -> Result<(CsvInfo, Vec<String>), PipelineError> {
    let parsed = parse_bytes_auto(bytes)?;
    Ok(check_parsed(&parsed))
}

/// Parse and validate a CSV file without expanding anything.
pub fn validate_path(path: &Path) -> Result<(CsvInfo, Vec<String>), PipelineError> {
    let parsed = parse_csv_file_auto(path)?;
    Ok(check_parsed(&parsed))
}

/// Convert validated records into typed rows (1-based row numbers in errors).
pub fn to_input_rows(records: &[Value]) -> Result<Vec<InputRow>, RowError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| InputRow::from_record(i + 1, record))
        .collect()
}

fn check_parsed(parsed: &ParseResult) -> (CsvInfo, Vec<String>) {
    log_info("📖 Reading CSV file...");
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Detected separator: '{}'",
        format_delimiter(parsed.delimiter)
    ));
    log_success(format!("Read {} rows", parsed.records.len()));

    log_info("✔️  Validating rows...");
    let errors = validate_parsed(parsed);
    print_validation_result(&errors);

    (CsvInfo::from(parsed), errors)
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

fn print_validation_result(errors: &[String]) {
    if errors.is_empty() {
        log_success("All rows valid!");
        return;
    }

    log_warning(format!("{} problems found", errors.len()));
    for err in errors.iter().take(5) {
        log_error(err.clone());
    }
    if errors.len() > 5 {
        log_warning(format!("... +{} more", errors.len() - 5));
    }
}

fn print_expansion_summary(records: &[OutputRecord]) {
    log_success(format!("Generated {} records", records.len()));

    let mut per_entity: BTreeMap<&'static str, usize> = BTreeMap::new();
    for record in records {
        *per_entity.entry(record.entity().as_str()).or_default() += 1;
    }
    for (entity, count) in per_entity {
        log_info_indent(format!("{}: {}", entity, count), 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, Entity};
    use crate::parser::parse_str;
    use crate::transform::clock::FixedClock;
    use chrono::NaiveDate;

    const HEADER: &str = "ASIN,Daily Budget,Keyword Text,Match Type,Bid,Portfolio ID,Percentage,Naming convention tag,Placement,SKU,Bidding Strategy";

    fn parsed(rows: &[&str]) -> ParseResult {
        let content = format!("{}\n{}", HEADER, rows.join("\n"));
        parse_str(&content, ',', "utf-8".into()).unwrap()
    }

    fn run(parsed: ParseResult, cross_negation: bool) -> PipelineResult {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        generate_from_parsed(
            parsed,
            &GenerateOptions { cross_negation },
            &mut RandomIdGenerator::seeded(1),
            &clock,
        )
        .unwrap()
    }

    #[test]
    fn test_default_options() {
        assert!(GenerateOptions::default().cross_negation);
    }

    #[test]
    fn test_end_to_end_broad_row() {
        let result = run(parsed(&["B0XYZ98765,50,desk lamp,Broad,1.25,,,,,SKU123,"]), true);

        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert_eq!(result.csv_info.row_count, 1);

        let records = result.records();
        let entities: Vec<Entity> = records.iter().map(|r| r.entity()).collect();
        assert_eq!(
            entities,
            vec![
                Entity::Campaign,
                Entity::AdGroup,
                Entity::ProductAd,
                Entity::Keyword,
                Entity::NegativeKeyword
            ]
        );
        assert_eq!(
            records[0].get(Column::CampaignName).as_str(),
            Some("BR_B0XYZ98765_desk lamp")
        );
        assert_eq!(records[0].get(Column::StartDate).as_str(), Some("20250131"));
        assert_eq!(
            records[0].get(Column::BiddingStrategy).as_str(),
            Some("Dynamic bids - down only")
        );
        assert_eq!(records[1].get(Column::AdGroupDefaultBid).as_f64(), Some(1.25));
        assert_eq!(records[2].get(Column::Sku).as_str(), Some("SKU123"));
        assert_eq!(records[3].get(Column::MatchType).as_str(), Some("Broad"));
        assert_eq!(records[4].get(Column::MatchType).as_str(), Some("Negative Exact"));
    }

    #[test]
    fn test_record_count_per_row() {
        let result = run(
            parsed(&[
                "B0AAAAAAAA,10,lamp,exact,1,,,,,S1,",
                "B0BBBBBBBB,10,lamp,phrase,1,,25,tag,Placement Top,S2,",
                "B0CCCCCCCC,10,lamp,broad,1,,,,,S3,",
            ]),
            false,
        );
        assert_eq!(result.records().len(), 4 + 5 + 4);
    }

    #[test]
    fn test_invalid_table_is_not_expanded() {
        let result = run(
            parsed(&[
                "B0AAAAAAAA,10,lamp,exact,1,,,,,S1,",
                "XXAAAAAAAA,1,lamp,exact,1,,,,,S2,",
            ]),
            true,
        );

        assert!(!result.is_valid());
        assert!(result.records().is_empty());
        assert_eq!(result.errors().len(), 2);
        assert!(result.errors()[0].starts_with("Invalid ASIN in row 2"));
        assert!(result.errors()[1].starts_with("Invalid Daily Budget in row 2"));
    }

    #[test]
    fn test_missing_column_takes_failure_path() {
        let parsed = parse_str("ASIN,Bid\nB0AAAAAAAA,1", ',', "utf-8".into()).unwrap();
        let result = run(parsed, true);
        assert!(result
            .errors()
            .iter()
            .any(|e| e == "Missing required column: Daily Budget"));
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let parsed = parse_str(HEADER, ',', "utf-8".into()).unwrap();
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        let err = generate_from_parsed(
            parsed,
            &GenerateOptions::default(),
            &mut RandomIdGenerator::seeded(1),
            &clock,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn test_validate_bytes() {
        let csv = format!("{}\nB0AAAAAAAA,10,lamp,exact,99,,,,,S1,", HEADER);
        let (info, errors) = validate_bytes(csv.as_bytes()).unwrap();
        assert_eq!(info.row_count, 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid Bid in row 1"));
    }

    #[test]
    fn test_generate_from_bytes_semicolon() {
        let csv =
            "ASIN;Daily Budget;Keyword Text;Match Type;Bid;SKU\nB0AAAAAAAA;10;lamp;exact;1;S1";
        let result = generate_from_bytes(csv.as_bytes(), GenerateOptions::default()).unwrap();
        assert_eq!(result.csv_info.delimiter, ';');
        assert_eq!(result.records().len(), 4);
    }
}
