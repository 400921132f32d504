//! Campaign expansion: one validated row becomes a small family of bulk
//! sheet records sharing generated identifiers.
//!
//! ```text
//! InputRow ──▶ Campaign
//!              Ad Group           (under the campaign)
//!              Product Ad         (under the ad group)
//!              Keyword            (under the ad group)
//!              Bidding Adjustment (if Placement is set)
//!              Negative Keyword   (cross negation, broad/phrase only)
//! ```
//!
//! Rows must have passed [`crate::validation`] first; nothing is re-checked here.

use crate::config::DEFAULT_BIDDING_STRATEGY;
use crate::models::{
    AdGroupRecord, BiddingAdjustmentRecord, CampaignRecord, InputRow, KeywordRecord,
    NegativeKeywordRecord, OutputRecord, ProductAdRecord,
};

use super::clock::Clock;
use super::ids::IdGenerator;

/// Expand every row, in input order. The start date is read once per run.
pub fn expand<G, C>(
    rows: &[InputRow],
    cross_negation: bool,
    ids: &mut G,
    clock: &C,
) -> Vec<OutputRecord>
where
    G: IdGenerator + ?Sized,
    C: Clock + ?Sized,
{
    let start_date = clock.start_date();
    rows.iter()
        .flat_map(|row| expand_row(row, cross_negation, &mut *ids, &start_date))
        .collect()
}

/// Expand a single row.
pub fn expand_row<G>(
    row: &InputRow,
    cross_negation: bool,
    ids: &mut G,
    start_date: &str,
) -> Vec<OutputRecord>
where
    G: IdGenerator + ?Sized,
{
    let campaign_id = ids.next_id();
    let ad_group_id = ids.next_id();
    let ad_id = ids.next_id();
    let keyword_id = ids.next_id();
    let negative_keyword_id =
        (cross_negation && row.match_type.is_cross_negated()).then(|| ids.next_id());

    let mut records = Vec::with_capacity(6);

    records.push(OutputRecord::Campaign(CampaignRecord {
        campaign_id: campaign_id.clone(),
        campaign_name: campaign_name(row),
        start_date: start_date.to_string(),
        daily_budget: row.daily_budget,
        bidding_strategy: row
            .bidding_strategy
            .clone()
            .unwrap_or_else(|| DEFAULT_BIDDING_STRATEGY.to_string()),
        portfolio_id: row.portfolio_id.clone(),
    }));

    records.push(OutputRecord::AdGroup(AdGroupRecord {
        campaign_id: campaign_id.clone(),
        ad_group_id: ad_group_id.clone(),
        ad_group_name: ad_group_name(row),
        default_bid: row.bid,
    }));

    records.push(OutputRecord::ProductAd(ProductAdRecord {
        campaign_id: campaign_id.clone(),
        ad_group_id: ad_group_id.clone(),
        ad_id,
        sku: row.sku.clone(),
    }));

    records.push(OutputRecord::Keyword(KeywordRecord {
        campaign_id: campaign_id.clone(),
        ad_group_id: ad_group_id.clone(),
        keyword_id,
        bid: row.bid,
        keyword_text: row.keyword_text.clone(),
        match_type: row.match_type_text.clone(),
    }));

    if let Some(placement) = &row.placement {
        records.push(OutputRecord::BiddingAdjustment(BiddingAdjustmentRecord {
            campaign_id: campaign_id.clone(),
            placement: placement.clone(),
            percentage: row.percentage,
        }));
    }

    if let Some(keyword_id) = negative_keyword_id {
        records.push(OutputRecord::NegativeKeyword(NegativeKeywordRecord {
            campaign_id,
            ad_group_id,
            keyword_id,
            keyword_text: row.keyword_text.clone(),
        }));
    }

    records
}

/// `<prefix><ASIN>[_<tag>]_<keyword text>`
pub fn campaign_name(row: &InputRow) -> String {
    let mut name = format!("{}{}", row.match_type.prefix(), row.asin);
    if let Some(tag) = row.naming_tag.as_deref().filter(|t| !t.is_empty()) {
        name.push('_');
        name.push_str(tag);
    }
    name.push('_');
    name.push_str(&row.keyword_text);
    name
}

pub fn ad_group_name(row: &InputRow) -> String {
    format!("AG_{}", row.asin)
}
