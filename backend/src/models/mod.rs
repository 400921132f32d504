//! Domain models for the campaign generator.
//!
//! - [`InputRow`] - one validated line of the uploaded parameter table
//! - [`MatchType`] - keyword match mode, which also picks the campaign name prefix
//! - [`OutputRecord`] - one line of the bulk upload sheet, one variant per [`Entity`]
//! - [`Column`] - the bulk sheet columns, in output order
//! - [`CellValue`] - a single output cell

use serde_json::{Map, Value};

use crate::config::{NEGATIVE_EXACT, OPERATION, PRODUCT, STATE_ENABLED, TARGETING_MANUAL};
use crate::error::RowError;

// =============================================================================
// Input columns
// =============================================================================

/// Header names of the uploaded table.
pub mod input {
    pub const ASIN: &str = "ASIN";
    pub const DAILY_BUDGET: &str = "Daily Budget";
    pub const KEYWORD_TEXT: &str = "Keyword Text";
    pub const MATCH_TYPE: &str = "Match Type";
    pub const BID: &str = "Bid";
    pub const PORTFOLIO_ID: &str = "Portfolio ID";
    pub const PERCENTAGE: &str = "Percentage";
    pub const NAMING_TAG: &str = "Naming convention tag";
    pub const PLACEMENT: &str = "Placement";
    pub const BIDDING_STRATEGY: &str = "Bidding Strategy";
    pub const SKU: &str = "SKU";

    /// Columns that must exist in the header row.
    pub const REQUIRED: [&str; 6] = [ASIN, DAILY_BUDGET, KEYWORD_TEXT, MATCH_TYPE, BID, SKU];

    /// Columns that may be left out entirely.
    pub const OPTIONAL: [&str; 5] =
        [PORTFOLIO_ID, PERCENTAGE, NAMING_TAG, PLACEMENT, BIDDING_STRATEGY];
}

/// Spreadsheet exports write these where a value is missing.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read a cell from a parsed record. Blank cells and [`MISSING_MARKERS`]
/// (matched exactly, after trimming) count as absent.
pub fn cell<'a>(record: &'a Value, column: &str) -> Option<&'a str> {
    record
        .get(column)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !MISSING_MARKERS.contains(s))
}

/// Parse a decimal cell. Rejects NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// =============================================================================
// Match Type
// =============================================================================

/// Keyword match mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Exact,
    Broad,
    Phrase,
}

impl MatchType {
    /// Parse case-insensitively. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "exact" => Some(Self::Exact),
            "broad" => Some(Self::Broad),
            "phrase" => Some(Self::Phrase),
            _ => None,
        }
    }

    /// Campaign name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Exact => "OW_",
            Self::Broad => "BR_",
            Self::Phrase => "PH_",
        }
    }

    /// Whether cross negation adds a negative exact keyword for this type.
    pub fn is_cross_negated(&self) -> bool {
        matches!(self, Self::Broad | Self::Phrase)
    }
}

// =============================================================================
// Input Row
// =============================================================================

/// One row of the parameter table, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub asin: String,
    pub daily_budget: f64,
    pub keyword_text: String,
    pub match_type: MatchType,
    /// Match type as the user typed it; written back unchanged.
    pub match_type_text: String,
    pub bid: f64,
    pub portfolio_id: Option<String>,
    pub percentage: Option<f64>,
    pub naming_tag: Option<String>,
    pub placement: Option<String>,
    pub bidding_strategy: Option<String>,
    pub sku: Option<String>,
}

impl InputRow {
    /// Convert a parsed CSV record. `row` is the 1-based row number used in errors.
    pub fn from_record(row: usize, record: &Value) -> Result<Self, RowError> {
        let required = |column: &str| {
            cell(record, column)
                .map(str::to_string)
                .ok_or_else(|| RowError::MissingValue {
                    row,
                    column: column.to_string(),
                })
        };
        let number = |column: &str, raw: &str| {
            parse_number(raw).ok_or_else(|| RowError::InvalidValue {
                row,
                column: column.to_string(),
                value: raw.to_string(),
            })
        };
        let optional = |column: &str| cell(record, column).map(str::to_string);

        let match_type_text = required(input::MATCH_TYPE)?;
        let match_type =
            MatchType::parse(&match_type_text).ok_or_else(|| RowError::InvalidValue {
                row,
                column: input::MATCH_TYPE.to_string(),
                value: match_type_text.clone(),
            })?;

        let percentage = match cell(record, input::PERCENTAGE) {
            Some(raw) => Some(number(input::PERCENTAGE, raw)?),
            None => None,
        };

        Ok(Self {
            asin: required(input::ASIN)?,
            daily_budget: number(input::DAILY_BUDGET, &required(input::DAILY_BUDGET)?)?,
            keyword_text: required(input::KEYWORD_TEXT)?,
            match_type,
            match_type_text,
            bid: number(input::BID, &required(input::BID)?)?,
            portfolio_id: optional(input::PORTFOLIO_ID),
            percentage,
            naming_tag: optional(input::NAMING_TAG),
            placement: optional(input::PLACEMENT),
            bidding_strategy: optional(input::BIDDING_STRATEGY),
            sku: optional(input::SKU),
        })
    }
}

// =============================================================================
// Output columns and cells
// =============================================================================

/// Columns of the bulk upload sheet, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Product,
    Entity,
    Operation,
    CampaignId,
    AdGroupId,
    AdId,
    KeywordId,
    CampaignName,
    AdGroupName,
    StartDate,
    TargetingType,
    State,
    DailyBudget,
    BiddingStrategy,
    PortfolioId,
    AdGroupDefaultBid,
    Sku,
    Bid,
    KeywordText,
    MatchType,
    Placement,
    Percentage,
}

impl Column {
    pub const ALL: [Column; 22] = [
        Column::Product,
        Column::Entity,
        Column::Operation,
        Column::CampaignId,
        Column::AdGroupId,
        Column::AdId,
        Column::KeywordId,
        Column::CampaignName,
        Column::AdGroupName,
        Column::StartDate,
        Column::TargetingType,
        Column::State,
        Column::DailyBudget,
        Column::BiddingStrategy,
        Column::PortfolioId,
        Column::AdGroupDefaultBid,
        Column::Sku,
        Column::Bid,
        Column::KeywordText,
        Column::MatchType,
        Column::Placement,
        Column::Percentage,
    ];

    /// Header text in the bulk sheet.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Product => "Product",
            Column::Entity => "Entity",
            Column::Operation => "Operation",
            Column::CampaignId => "Campaign ID",
            Column::AdGroupId => "Ad Group ID",
            Column::AdId => "Ad ID",
            Column::KeywordId => "Keyword ID",
            Column::CampaignName => "Campaign Name",
            Column::AdGroupName => "Ad Group Name",
            Column::StartDate => "Start Date",
            Column::TargetingType => "Targeting Type",
            Column::State => "State",
            Column::DailyBudget => "Daily Budget",
            Column::BiddingStrategy => "Bidding Strategy",
            Column::PortfolioId => "Portfolio ID",
            Column::AdGroupDefaultBid => "Ad Group Default Bid",
            Column::Sku => "SKU",
            Column::Bid => "Bid",
            Column::KeywordText => "Keyword Text",
            Column::MatchType => "Match Type",
            Column::Placement => "Placement",
            Column::Percentage => "Percentage",
        }
    }

    /// Position in [`Column::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// A single output cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    fn optional_text(value: &Option<String>) -> Self {
        value.as_deref().map_or(CellValue::Empty, |s| CellValue::Text(s.to_string()))
    }

    fn optional_number(value: Option<f64>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    fn to_json(&self) -> Value {
        match self {
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Empty => Value::Null,
        }
    }
}

// =============================================================================
// Output Records
// =============================================================================

/// Entity discriminator of the bulk sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Campaign,
    AdGroup,
    ProductAd,
    Keyword,
    BiddingAdjustment,
    NegativeKeyword,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Campaign => "Campaign",
            Entity::AdGroup => "Ad Group",
            Entity::ProductAd => "Product Ad",
            Entity::Keyword => "Keyword",
            Entity::BiddingAdjustment => "Bidding Adjustment",
            Entity::NegativeKeyword => "Negative Keyword",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    pub campaign_id: String,
    pub campaign_name: String,
    /// `YYYYMMDD`
    pub start_date: String,
    pub daily_budget: f64,
    pub bidding_strategy: String,
    pub portfolio_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdGroupRecord {
    pub campaign_id: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub default_bid: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductAdRecord {
    pub campaign_id: String,
    pub ad_group_id: String,
    pub ad_id: String,
    pub sku: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    pub campaign_id: String,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub bid: f64,
    pub keyword_text: String,
    pub match_type: String,
}

/// Placement bid adjustment. Attached to the campaign only.
#[derive(Debug, Clone, PartialEq)]
pub struct BiddingAdjustmentRecord {
    pub campaign_id: String,
    pub placement: String,
    pub percentage: Option<f64>,
}

/// Negative exact keyword added by cross negation.
#[derive(Debug, Clone, PartialEq)]
pub struct NegativeKeywordRecord {
    pub campaign_id: String,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub keyword_text: String,
}

/// One line of the bulk upload sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputRecord {
    Campaign(CampaignRecord),
    AdGroup(AdGroupRecord),
    ProductAd(ProductAdRecord),
    Keyword(KeywordRecord),
    BiddingAdjustment(BiddingAdjustmentRecord),
    NegativeKeyword(NegativeKeywordRecord),
}

impl OutputRecord {
    pub fn entity(&self) -> Entity {
        match self {
            OutputRecord::Campaign(_) => Entity::Campaign,
            OutputRecord::AdGroup(_) => Entity::AdGroup,
            OutputRecord::ProductAd(_) => Entity::ProductAd,
            OutputRecord::Keyword(_) => Entity::Keyword,
            OutputRecord::BiddingAdjustment(_) => Entity::BiddingAdjustment,
            OutputRecord::NegativeKeyword(_) => Entity::NegativeKeyword,
        }
    }

    pub fn campaign_id(&self) -> &str {
        match self {
            OutputRecord::Campaign(r) => &r.campaign_id,
            OutputRecord::AdGroup(r) => &r.campaign_id,
            OutputRecord::ProductAd(r) => &r.campaign_id,
            OutputRecord::Keyword(r) => &r.campaign_id,
            OutputRecord::BiddingAdjustment(r) => &r.campaign_id,
            OutputRecord::NegativeKeyword(r) => &r.campaign_id,
        }
    }

    /// Populated cells of this record, in column order.
    pub fn cells(&self) -> Vec<(Column, CellValue)> {
        let mut cells = vec![
            (Column::Product, CellValue::text(PRODUCT)),
            (Column::Entity, CellValue::text(self.entity().as_str())),
            (Column::Operation, CellValue::text(OPERATION)),
        ];

        match self {
            OutputRecord::Campaign(r) => cells.extend([
                (Column::CampaignId, CellValue::text(&r.campaign_id)),
                (Column::CampaignName, CellValue::text(&r.campaign_name)),
                (Column::StartDate, CellValue::text(&r.start_date)),
                (Column::TargetingType, CellValue::text(TARGETING_MANUAL)),
                (Column::State, CellValue::text(STATE_ENABLED)),
                (Column::DailyBudget, CellValue::Number(r.daily_budget)),
                (Column::BiddingStrategy, CellValue::text(&r.bidding_strategy)),
                (Column::PortfolioId, CellValue::optional_text(&r.portfolio_id)),
            ]),
            OutputRecord::AdGroup(r) => cells.extend([
                (Column::CampaignId, CellValue::text(&r.campaign_id)),
                (Column::AdGroupId, CellValue::text(&r.ad_group_id)),
                (Column::AdGroupName, CellValue::text(&r.ad_group_name)),
                (Column::State, CellValue::text(STATE_ENABLED)),
                (Column::AdGroupDefaultBid, CellValue::Number(r.default_bid)),
            ]),
            OutputRecord::ProductAd(r) => cells.extend([
                (Column::CampaignId, CellValue::text(&r.campaign_id)),
                (Column::AdGroupId, CellValue::text(&r.ad_group_id)),
                (Column::AdId, CellValue::text(&r.ad_id)),
                (Column::State, CellValue::text(STATE_ENABLED)),
                (Column::Sku, CellValue::optional_text(&r.sku)),
            ]),
            OutputRecord::Keyword(r) => cells.extend([
                (Column::CampaignId, CellValue::text(&r.campaign_id)),
                (Column::AdGroupId, CellValue::text(&r.ad_group_id)),
                (Column::KeywordId, CellValue::text(&r.keyword_id)),
                (Column::State, CellValue::text(STATE_ENABLED)),
                (Column::Bid, CellValue::Number(r.bid)),
                (Column::KeywordText, CellValue::text(&r.keyword_text)),
                (Column::MatchType, CellValue::text(&r.match_type)),
            ]),
            OutputRecord::BiddingAdjustment(r) => cells.extend([
                (Column::CampaignId, CellValue::text(&r.campaign_id)),
                (Column::Placement, CellValue::text(&r.placement)),
                (Column::Percentage, CellValue::optional_number(r.percentage)),
            ]),
            OutputRecord::NegativeKeyword(r) => cells.extend([
                (Column::CampaignId, CellValue::text(&r.campaign_id)),
                (Column::AdGroupId, CellValue::text(&r.ad_group_id)),
                (Column::KeywordId, CellValue::text(&r.keyword_id)),
                (Column::State, CellValue::text(STATE_ENABLED)),
                (Column::KeywordText, CellValue::text(&r.keyword_text)),
                (Column::MatchType, CellValue::text(NEGATIVE_EXACT)),
            ]),
        }

        cells.sort_by_key(|(column, _)| column.index());
        cells
    }

    /// Value of one column; [`CellValue::Empty`] when the entity does not use it.
    pub fn get(&self, column: Column) -> CellValue {
        self.cells()
            .into_iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
            .unwrap_or(CellValue::Empty)
    }

    /// Full row, one cell per [`Column::ALL`] entry.
    pub fn row(&self) -> Vec<CellValue> {
        let mut row = vec![CellValue::Empty; Column::ALL.len()];
        for (column, value) in self.cells() {
            row[column.index()] = value;
        }
        row
    }

    /// JSON object keyed by header. Blank cells are omitted.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (column, value) in self.cells() {
            if !value.is_empty() {
                obj.insert(column.header().to_string(), value.to_json());
            }
        }
        Value::Object(obj)
    }
}

// =============================================================================
// Tests
// =============================================================================
